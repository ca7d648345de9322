//! Dataset preparation.
//!
//! - paired shuffling and train/validation/test partitioning (`partition`)
//! - seeded synthetic regression data (`synthetic`)

pub mod partition;
pub mod synthetic;

pub use partition::*;
pub use synthetic::*;
