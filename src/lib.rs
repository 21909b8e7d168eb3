pub mod sets;
pub mod statistics;
