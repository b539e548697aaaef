//! Input datasets: the fixed reference sets and seeded synthetic samples.

pub mod reference;
pub mod synthetic;

pub use reference::*;
pub use synthetic::*;
