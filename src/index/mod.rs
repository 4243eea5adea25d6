pub mod builder;
pub mod classify;
pub mod strips;

pub use builder::{build_index, build_from_archive};
pub use classify::{classify, Rejection};
pub use strips::StripIndex;
