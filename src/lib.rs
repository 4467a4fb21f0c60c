pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod penetration;
pub mod topology;

pub use error::{PierceError, Result};
