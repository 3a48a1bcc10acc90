pub mod shape;
pub mod transform;

pub use shape::*;
pub use transform::*;
