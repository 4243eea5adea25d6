pub mod error;
pub mod server;

pub use error::ServeError;
pub use server::*;
