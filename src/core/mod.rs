pub mod strip;
pub mod year;

pub use strip::*;
pub use year::*;
