use crate::core::LayerExporter;
use crate::domain::model::OutputFormat;
use crate::domain::ports::ExportOutcome;
use crate::utils::error::{ExportError, Result};

#[derive(Debug)]
pub struct ExportFailure {
    pub layer: String,
    pub format: OutputFormat,
    pub error: ExportError,
}

#[derive(Debug, Default)]
pub struct ExportSummary {
    pub exported: Vec<ExportOutcome>,
    pub failures: Vec<ExportFailure>,
}

impl ExportSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs every layer through every format, one export at a time.
pub struct ExportEngine<E: LayerExporter> {
    exporter: E,
    formats: Vec<OutputFormat>,
    continue_on_error: bool,
}

impl<E: LayerExporter> ExportEngine<E> {
    pub fn new(exporter: E) -> Self {
        Self {
            exporter,
            formats: OutputFormat::ALL.to_vec(),
            continue_on_error: false,
        }
    }

    pub fn with_formats(mut self, formats: Vec<OutputFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// Keep going after a failed (layer, format) pair instead of aborting the run.
    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.continue_on_error = enabled;
        self
    }

    /// In fail-fast mode the first error is returned and later pairs are never attempted.
    pub async fn run(&self, layers: &[String]) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();

        for layer in layers {
            for &format in &self.formats {
                tracing::info!("Exporting layer '{}' as {}", layer, format);

                match self.exporter.export(layer, format).await {
                    Ok(outcome) => summary.exported.push(outcome),
                    Err(error) if self.continue_on_error => {
                        tracing::error!("Export of '{}' as {} failed: {}", layer, format, error);
                        summary.failures.push(ExportFailure {
                            layer: layer.clone(),
                            format,
                            error,
                        });
                    }
                    Err(error) => {
                        tracing::error!(
                            "Export of '{}' as {} failed, aborting run: {}",
                            layer,
                            format,
                            error
                        );
                        return Err(error);
                    }
                }
            }
        }

        tracing::info!(
            "Export run finished: {} succeeded, {} failed",
            summary.exported.len(),
            summary.failures.len()
        );
        Ok(summary)
    }
}
