pub mod forecast;
pub mod measurement;

pub use forecast::*;
pub use measurement::*;
