#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod archive;
pub mod config;
pub mod core;
pub mod error;
pub mod index;
pub mod query;
pub mod stats;

pub use error::{ArchiveError, ConfigError, IndexError};
pub use index::{build_index, StripIndex};
