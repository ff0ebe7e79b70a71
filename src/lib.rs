pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod output;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::HttpTransport;
pub use config::toml_config::TomlConfig;
pub use core::islands::IslandResolver;
pub use core::status::StatusChecker;
pub use domain::model::StatusRecord;
pub use utils::error::{Result, StatusError};
