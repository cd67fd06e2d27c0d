use crate::domain::model::{ExportRequest, OutputFormat};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human-readable location of `path`, used in logs and summaries.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn wfs_url(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn max_features(&self) -> usize;
    fn unwanted_columns(&self, format: OutputFormat) -> &[String];
    fn request_timeout(&self) -> Option<Duration>;
}

/// One output format's half of the pipeline: decoding the response body,
/// removing unwanted fields and serializing what remains.
pub trait ExportFormat: Send + Sync {
    type Raw: Send;
    type Cleaned: Send;

    const FORMAT: OutputFormat;

    fn decode(body: String) -> Result<Self::Raw>;
    fn clean(raw: Self::Raw, unwanted: &[String]) -> Result<Self::Cleaned>;
    fn serialize(cleaned: &Self::Cleaned) -> Result<Vec<u8>>;
    fn record_count(cleaned: &Self::Cleaned) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub request: ExportRequest,
    pub records: usize,
    pub location: String,
}

#[async_trait]
pub trait LayerExporter: Send + Sync {
    async fn export(&self, layer: &str, format: OutputFormat) -> Result<ExportOutcome>;
}
