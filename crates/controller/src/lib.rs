//! World map interaction: dataset loading, country coloring, hover,
//! click-to-zoom and the details panel, independent of any DOM.

pub mod config;
pub mod error;
pub mod event;
pub mod html;
pub mod map;
pub mod panel;
pub mod shape;
pub mod tooltip;

pub use config::*;
pub use error::*;
pub use event::*;
pub use map::*;
pub use panel::*;
pub use shape::*;
pub use tooltip::*;
