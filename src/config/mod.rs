#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;

use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "/mnt/apache_nas_data/public/export_json_csv";
pub const DEFAULT_WFS_URL: &str = "https://www.geo2france.fr/geoserver/cr_hdf/wfs";
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Process-wide export settings. Loaded and validated once, then only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: String,
    pub unwanted_csv_columns: Vec<String>,
    pub unwanted_json_columns: Vec<String>,
    pub max_features: usize,
    pub wfs_url: String,
    pub layers: Vec<String>,
    pub formats: Vec<OutputFormat>,
    pub log_level: String,
    pub request_timeout_secs: Option<u64>,
    pub continue_on_error: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            unwanted_csv_columns: vec!["FID".to_string(), "the_geom".to_string()],
            unwanted_json_columns: vec!["bbox".to_string()],
            max_features: DEFAULT_MAX_FEATURES,
            wfs_url: DEFAULT_WFS_URL.to_string(),
            layers: vec!["epci".to_string()],
            formats: OutputFormat::ALL.to_vec(),
            log_level: "INFO".to_string(),
            request_timeout_secs: None,
            continue_on_error: false,
        }
    }
}

impl ExportSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each known variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(value) = lookup("OUTPUT_DIR") {
            settings.output_dir = value;
        }
        if let Some(value) = lookup("UNWANTED_CSV_COLUMNS") {
            settings.unwanted_csv_columns = split_list(&value);
        }
        if let Some(value) = lookup("UNWANTED_JSON_COLUMNS") {
            settings.unwanted_json_columns = split_list(&value);
        }
        if let Some(value) = lookup("MAX_FEATURES") {
            settings.max_features = parse_number("MAX_FEATURES", &value)?;
        }
        if let Some(value) = lookup("GEOSERVER_WFS_URL") {
            settings.wfs_url = value;
        }
        if let Some(value) = lookup("GEOSERVER_LAYERS") {
            settings.layers = split_list(&value);
        }
        if let Some(value) = lookup("EXPORT_FORMATS") {
            settings.formats = parse_formats("EXPORT_FORMATS", &value)?;
        }
        if let Some(value) = lookup("LOG_LEVEL") {
            settings.log_level = value;
        }
        if let Some(value) = lookup("REQUEST_TIMEOUT_SECS") {
            settings.request_timeout_secs = Some(parse_number("REQUEST_TIMEOUT_SECS", &value)?);
        }
        if let Some(value) = lookup("CONTINUE_ON_ERROR") {
            settings.continue_on_error = parse_bool("CONTINUE_ON_ERROR", &value)?;
        }

        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ExportError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Keys missing from the document keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replaces `${VAR}` with the variable's value; unset variables are left as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExportError::ConfigError {
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ExportError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ExportError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "expected a boolean (true/false)".to_string(),
        }),
    }
}

pub(crate) fn parse_formats(field: &str, value: &str) -> Result<Vec<OutputFormat>> {
    split_list(value)
        .iter()
        .map(|item| {
            item.parse::<OutputFormat>()
                .map_err(|reason| ExportError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: item.clone(),
                    reason,
                })
        })
        .collect()
}

impl Validate for ExportSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_wfs_endpoint("wfs_url", &self.wfs_url)?;
        validation::validate_output_dir("output_dir", &self.output_dir)?;
        validation::validate_at_least("max_features", self.max_features as u64, 1)?;
        validation::validate_log_level("log_level", &self.log_level)?;

        if self.layers.is_empty() {
            return Err(ExportError::MissingConfigError {
                field: "layers".to_string(),
            });
        }
        for layer in &self.layers {
            validation::validate_layer_name("layers", layer)?;
        }

        if self.formats.is_empty() {
            return Err(ExportError::MissingConfigError {
                field: "formats".to_string(),
            });
        }

        if let Some(timeout) = self.request_timeout_secs {
            validation::validate_at_least("request_timeout_secs", timeout, 1)?;
        }

        Ok(())
    }
}

impl ConfigProvider for ExportSettings {
    fn wfs_url(&self) -> &str {
        &self.wfs_url
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn max_features(&self) -> usize {
        self.max_features
    }

    fn unwanted_columns(&self, format: OutputFormat) -> &[String] {
        match format {
            OutputFormat::Csv => &self.unwanted_csv_columns,
            OutputFormat::Json => &self.unwanted_json_columns,
        }
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
