pub mod matchup;
pub use matchup::*;

pub mod convergence;
pub use convergence::*;

pub mod dataset;
pub use dataset::*;

pub mod disk;
pub use disk::*;
