pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpSource, LocalFileSource, UploadSource};
pub use config::settings::ExplorerSettings;
pub use crate::core::explorer::ExplorerEngine;
pub use utils::error::{ExplorerError, Result};
