pub mod event_bus;
pub mod frame;
pub mod job;
pub mod scheduler;
pub mod tween;

pub use event_bus::*;
pub use frame::*;
pub use job::*;
pub use scheduler::*;
pub use tween::*;
