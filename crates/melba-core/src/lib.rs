pub mod config;
pub mod error;

pub use config::MelbaConfig;
pub use error::{MelbaError, Result};
