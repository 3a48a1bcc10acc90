pub mod dataset;
pub mod loader;

pub use dataset::*;
pub use loader::*;
