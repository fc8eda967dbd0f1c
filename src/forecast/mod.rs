pub mod error;
pub mod orchestrator;

pub use error::*;
pub use orchestrator::*;
