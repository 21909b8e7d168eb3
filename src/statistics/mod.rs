//! Operation counters and key partitioning for stress runs against a shared set.
//!
//! Each worker thread keeps its own [`StressStats`] and the driver merges them
//! once the workers have joined, so counting never touches the set's lock.

mod stats;
mod workload;
pub use stats::*;
pub use workload::*;
