pub mod chart;
pub mod ratings;

pub use chart::*;
pub use ratings::*;
