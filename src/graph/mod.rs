pub mod deps;
pub mod schedule;

pub use deps::*;
pub use schedule::*;
