use crate::utils::error::{ExportError, Result};
use crate::utils::logger;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ExportError {
    ExportError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The endpoint must be an absolute http(s) URL with a host; the WFS query is appended to it.
pub fn validate_wfs_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| invalid(field, endpoint, format!("Invalid URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            endpoint,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field, endpoint, "URL has no host"));
    }
    if url.fragment().is_some() {
        return Err(invalid(field, endpoint, "URL cannot carry a fragment"));
    }
    Ok(())
}

pub fn validate_output_dir(field: &str, dir: &str) -> Result<()> {
    if dir.trim().is_empty() || dir.contains('\0') {
        return Err(invalid(field, dir, "Output directory must be a non-empty path"));
    }
    Ok(())
}

pub fn validate_at_least(field: &str, value: u64, min: u64) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("Value must be at least {}", min)));
    }
    Ok(())
}

/// Layer names end up in `result_<layer>.<ext>`, so they must stay a single path component.
pub fn validate_layer_name(field: &str, layer: &str) -> Result<()> {
    if layer.trim().is_empty() {
        return Err(invalid(field, layer, "Layer name cannot be blank"));
    }
    if layer.contains(['/', '\\', '\0']) || layer == ".." || layer == "." {
        return Err(invalid(field, layer, "Layer name cannot contain path separators"));
    }
    Ok(())
}

pub fn validate_log_level(field: &str, level: &str) -> Result<()> {
    logger::tracing_level(level).map(|_| ()).ok_or_else(|| {
        invalid(
            field,
            level,
            "Expected one of TRACE, DEBUG, INFO, WARNING, ERROR, CRITICAL",
        )
    })
}
