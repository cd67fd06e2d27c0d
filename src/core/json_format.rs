use crate::core::ExportFormat;
use crate::domain::model::{FeatureList, OutputFormat};
use crate::utils::error::{ExportError, Result};
use serde_json::Value;

/// GeoJSON export: only the `features` array is written, minus unwanted keys.
pub struct JsonFormat;

impl ExportFormat for JsonFormat {
    type Raw = Value;
    type Cleaned = FeatureList;

    const FORMAT: OutputFormat = OutputFormat::Json;

    fn decode(body: String) -> Result<Value> {
        serde_json::from_str(&body).map_err(|e| ExportError::malformed("json", e.to_string()))
    }

    fn clean(raw: Value, unwanted: &[String]) -> Result<FeatureList> {
        clean_json(raw, unwanted)
    }

    fn serialize(cleaned: &FeatureList) -> Result<Vec<u8>> {
        serde_json::to_vec(cleaned).map_err(|e| ExportError::malformed("json", e.to_string()))
    }

    fn record_count(cleaned: &FeatureList) -> usize {
        cleaned.len()
    }
}

pub fn clean_json(raw: Value, unwanted: &[String]) -> Result<FeatureList> {
    let mut features = match raw {
        Value::Object(mut document) => match document.remove("features") {
            Some(Value::Array(features)) => features,
            Some(_) => return Err(ExportError::malformed("json", "'features' is not an array")),
            None => return Err(ExportError::malformed("json", "missing 'features' key")),
        },
        _ => return Err(ExportError::malformed("json", "response is not a JSON object")),
    };

    for (index, feature) in features.iter_mut().enumerate() {
        let Value::Object(properties) = feature else {
            return Err(ExportError::malformed(
                "json",
                format!("feature {} is not an object", index),
            ));
        };
        for key in unwanted {
            properties.shift_remove(key.as_str());
        }
    }

    tracing::debug!("JSON cleaned: {} features", features.len());
    Ok(features)
}
