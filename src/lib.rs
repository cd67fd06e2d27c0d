pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::config::{storage::LocalStorage, ExportSettings};
pub use crate::core::{
    engine::{ExportEngine, ExportSummary},
    pipeline::ExportPipeline,
};
pub use crate::domain::model::{ExportRequest, OutputFormat};
pub use crate::utils::error::{ExportError, Result};
