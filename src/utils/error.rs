use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("WFS request failed: {0}")]
    Retrieval(#[from] reqwest::Error),

    #[error("Invalid WFS request URL '{url}': {reason}")]
    InvalidRequestUrl { url: String, reason: String },

    #[error("Malformed {format} data: {message}")]
    MalformedData { format: String, message: String },

    #[error("Cannot write '{}': {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ExportError {
    pub fn malformed(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedData {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Retrieval(_) => ErrorSeverity::Medium,
            Self::MalformedData { .. } | Self::Persistence { .. } => ErrorSeverity::High,
            Self::InvalidRequestUrl { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Process exit code the CLI uses for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Retrieval(e) if e.is_timeout() => {
                "The WFS server did not answer in time; raise REQUEST_TIMEOUT_SECS or retry later"
            }
            Self::Retrieval(e) if e.is_status() => {
                "Check that the layer name exists on the WFS server and that the endpoint URL is correct"
            }
            Self::Retrieval(_) => "Check network connectivity and the GEOSERVER_WFS_URL setting",
            Self::InvalidRequestUrl { .. } => "Fix GEOSERVER_WFS_URL so it is an absolute http(s) URL",
            Self::MalformedData { .. } => {
                "The server answered with an unexpected payload; verify the layer supports CSV and JSON output"
            }
            Self::Persistence { .. } => "Check that OUTPUT_DIR exists or can be created and is writable",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the environment variables or configuration file passed with --config"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Retrieval(e) => match e.status() {
                Some(status) => format!("The WFS server rejected the request ({})", status),
                None => "Could not reach the WFS server".to_string(),
            },
            Self::MalformedData { format, .. } => {
                format!("The {} response could not be processed", format)
            }
            Self::Persistence { path, .. } => {
                format!("Could not write the export file {}", path.display())
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
