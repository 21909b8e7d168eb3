mod algebra;
mod lock_order;
mod render;
mod set;

pub use algebra::*;
pub use set::*;
