pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{error_log::FileErrorLog, http::GraphClient};
pub use config::cli::TerminalSelector;
pub use crate::core::engine::PruneEngine;
pub use utils::error::{PruneError, Result};
