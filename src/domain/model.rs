use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output formats requested from the WFS server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Csv, OutputFormat::Json];

    /// Value of the `outputFormat` query parameter.
    pub fn wfs_identifier(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wfs_identifier())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unsupported output format '{}' (expected csv or json)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub layer: String,
    pub format: OutputFormat,
    pub max_features: usize,
}

impl ExportRequest {
    pub fn new(layer: impl Into<String>, format: OutputFormat, max_features: usize) -> Self {
        Self {
            layer: layer.into(),
            format,
            max_features,
        }
    }

    /// `result_<layer>.<ext>`
    pub fn output_filename(&self) -> String {
        format!("result_{}.{}", self.layer, self.format.extension())
    }
}

/// Cleaned tabular data: the resolved header and every row aligned to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `index`, if both exist.
    pub fn value(&self, index: usize, column: &str) -> Option<&str> {
        let position = self.header.iter().position(|name| name == column)?;
        self.rows
            .get(index)
            .and_then(|row| row.get(position))
            .map(String::as_str)
    }
}

/// Cleaned feature objects; the `FeatureCollection` envelope is not kept.
pub type FeatureList = Vec<serde_json::Value>;
