pub mod ids;
pub mod point;

pub use ids::*;
pub use point::*;
