use crate::config::{parse_formats, ExportSettings};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "wfs-export")]
#[command(about = "Export WFS layers to cleaned CSV and JSON files")]
pub struct CliArgs {
    /// TOML settings file; environment variables are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Comma-separated layer names (overrides GEOSERVER_LAYERS)
    #[arg(long, value_delimiter = ',')]
    pub layers: Vec<String>,

    /// Comma-separated output formats: csv, json
    #[arg(long)]
    pub formats: Option<String>,

    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long)]
    pub wfs_url: Option<String>,

    #[arg(long)]
    pub max_features: Option<usize>,

    /// Keep exporting remaining layers after a failure
    #[arg(long)]
    pub continue_on_error: bool,

    /// Print the requests and target files without fetching anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliArgs {
    pub fn load_settings(&self) -> Result<ExportSettings> {
        let settings = match &self.config {
            Some(path) => ExportSettings::from_file(path)?,
            None => ExportSettings::from_env()?,
        };
        self.apply_overrides(settings)
    }

    pub fn apply_overrides(&self, mut settings: ExportSettings) -> Result<ExportSettings> {
        if !self.layers.is_empty() {
            settings.layers = self.layers.clone();
        }
        if let Some(formats) = &self.formats {
            settings.formats = parse_formats("--formats", formats)?;
        }
        if let Some(output_dir) = &self.output_dir {
            settings.output_dir = output_dir.clone();
        }
        if let Some(wfs_url) = &self.wfs_url {
            settings.wfs_url = wfs_url.clone();
        }
        if let Some(max_features) = self.max_features {
            settings.max_features = max_features;
        }
        if self.continue_on_error {
            settings.continue_on_error = true;
        }
        Ok(settings)
    }
}
