pub mod palette;
pub use palette::*;

pub mod heatmap;
pub use heatmap::*;
