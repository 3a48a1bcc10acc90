pub mod components;
pub mod interpolate;
pub mod picking;
pub mod zoom;

pub use components::*;
pub use interpolate::*;
pub use zoom::*;
