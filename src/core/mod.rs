pub mod csv_format;
pub mod engine;
pub mod json_format;
pub mod pipeline;
pub mod retriever;

pub use crate::domain::model::{CsvTable, ExportRequest, FeatureList, OutputFormat};
pub use crate::domain::ports::{ConfigProvider, ExportFormat, LayerExporter, Storage};
pub use crate::utils::error::Result;
