//! Set containers.
//!
//! # Submodules
//!
//! - [`concurrent`]: a hash set guarded by a reader/writer lock, shareable between
//!   threads, with union, intersection, difference, subset and equality over
//!   several instances

pub mod concurrent;
