use crate::core::csv_format::CsvFormat;
use crate::core::json_format::JsonFormat;
use crate::core::retriever::WfsClient;
use crate::core::{ConfigProvider, ExportFormat, ExportRequest, LayerExporter, Storage};
use crate::domain::model::OutputFormat;
use crate::domain::ports::ExportOutcome;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Retrieve, clean and store one layer in one format.
pub struct ExportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: WfsClient,
}

impl<S: Storage, C: ConfigProvider> ExportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = WfsClient::new(&config)?;
        tracing::debug!(
            "Export pipeline for {} writing under {}",
            config.wfs_url(),
            config.output_dir()
        );
        Ok(Self {
            storage,
            config,
            client,
        })
    }

    pub fn request(&self, layer: &str, format: OutputFormat) -> ExportRequest {
        ExportRequest::new(layer, format, self.config.max_features())
    }

    pub async fn run(&self, layer: &str, format: OutputFormat) -> Result<ExportOutcome> {
        match format {
            OutputFormat::Csv => self.run_format::<CsvFormat>(layer).await,
            OutputFormat::Json => self.run_format::<JsonFormat>(layer).await,
        }
    }

    /// Nothing is written unless every earlier step succeeded.
    pub async fn run_format<F: ExportFormat>(&self, layer: &str) -> Result<ExportOutcome> {
        let request = self.request(layer, F::FORMAT);

        let raw = self
            .client
            .fetch::<F>(self.config.wfs_url(), &request)
            .await?;

        let cleaned = F::clean(raw, self.config.unwanted_columns(F::FORMAT))?;
        let records = F::record_count(&cleaned);

        let data = F::serialize(&cleaned)?;
        let filename = request.output_filename();
        self.storage.write_file(&filename, &data).await?;

        let location = self.storage.location(&filename);
        tracing::info!(
            "Exported {} {} records of layer '{}' to {}",
            records,
            F::FORMAT,
            layer,
            location
        );

        Ok(ExportOutcome {
            request,
            records,
            location,
        })
    }
}

#[async_trait]
impl<S: Storage, C: ConfigProvider> LayerExporter for ExportPipeline<S, C> {
    async fn export(&self, layer: &str, format: OutputFormat) -> Result<ExportOutcome> {
        self.run(layer, format).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ExportError;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_count(&self) -> usize {
            self.files.lock().await.len()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ExportError::persistence(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                )
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn location(&self, path: &str) -> String {
            format!("memory://{}", path)
        }
    }

    struct MockConfig {
        wfs_url: String,
        unwanted_csv: Vec<String>,
        unwanted_json: Vec<String>,
    }

    impl MockConfig {
        fn new(wfs_url: String) -> Self {
            Self {
                wfs_url,
                unwanted_csv: vec!["FID".to_string(), "the_geom".to_string()],
                unwanted_json: vec!["bbox".to_string()],
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn wfs_url(&self) -> &str {
            &self.wfs_url
        }

        fn output_dir(&self) -> &str {
            "test_output"
        }

        fn max_features(&self) -> usize {
            5000
        }

        fn unwanted_columns(&self, format: OutputFormat) -> &[String] {
            match format {
                OutputFormat::Csv => &self.unwanted_csv,
                OutputFormat::Json => &self.unwanted_json,
            }
        }

        fn request_timeout(&self) -> Option<Duration> {
            None
        }
    }

    #[tokio::test]
    async fn test_run_csv_writes_cleaned_table() {
        let server = MockServer::start();
        let wfs_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/wfs")
                .query_param("typeName", "epci")
                .query_param("outputFormat", "csv");
            then.status(200).body("FID,the_geom,id,name\n1,POLY(...),10,A\n");
        });

        let storage = MockStorage::new();
        let pipeline =
            ExportPipeline::new(storage.clone(), MockConfig::new(server.url("/wfs"))).unwrap();

        let outcome = pipeline.run("epci", OutputFormat::Csv).await.unwrap();

        wfs_mock.assert();
        assert_eq!(outcome.records, 1);
        assert_eq!(outcome.location, "memory://result_epci.csv");

        let written = storage.get_file("result_epci.csv").await.unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), "id,name\n10,A\n");
    }

    #[tokio::test]
    async fn test_run_json_writes_feature_array() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wfs").query_param("outputFormat", "json");
            then.status(200)
                .json_body(serde_json::json!({"features": [{"id": 10, "bbox": [0, 0, 1, 1]}]}));
        });

        let storage = MockStorage::new();
        let pipeline =
            ExportPipeline::new(storage.clone(), MockConfig::new(server.url("/wfs"))).unwrap();

        let outcome = pipeline.run("epci", OutputFormat::Json).await.unwrap();

        assert_eq!(outcome.request.format, OutputFormat::Json);
        let written = storage.read_file("result_epci.json").await.unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), r#"[{"id":10}]"#);
    }

    #[tokio::test]
    async fn test_run_http_failure_writes_nothing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wfs");
            then.status(500);
        });

        let storage = MockStorage::new();
        let pipeline =
            ExportPipeline::new(storage.clone(), MockConfig::new(server.url("/wfs"))).unwrap();

        let result = pipeline.run("epci", OutputFormat::Csv).await;

        assert!(matches!(result, Err(ExportError::Retrieval(_))));
        assert_eq!(storage.file_count().await, 0);
    }

    #[tokio::test]
    async fn test_run_missing_features_writes_nothing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/wfs");
            then.status(200)
                .json_body(serde_json::json!({"type": "FeatureCollection"}));
        });

        let storage = MockStorage::new();
        let pipeline =
            ExportPipeline::new(storage.clone(), MockConfig::new(server.url("/wfs"))).unwrap();

        let result = pipeline.export("epci", OutputFormat::Json).await;

        assert!(matches!(result, Err(ExportError::MalformedData { .. })));
        assert!(storage.get_file("result_epci.json").await.is_none());
    }
}
