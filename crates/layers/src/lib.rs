pub mod legend;
pub mod symbology;
pub mod vector;

pub use legend::*;
pub use symbology::*;
pub use vector::*;
