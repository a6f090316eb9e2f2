pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::Config;
pub use constants::CONFIG_VERSION;
pub use error::DeskError;
pub use types::*;
