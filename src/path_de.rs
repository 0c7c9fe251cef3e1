use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GenerateError;

/// Deserialize with JSON-path context in error messages.
pub fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, GenerateError> {
    from_value_at("", value)
}

/// Like [`from_value_with_path`], with `prefix` (usually the `$ref` the value
/// was reached through) prepended to the reported path.
pub fn from_value_at<T: DeserializeOwned>(prefix: &str, value: Value) -> Result<T, GenerateError> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            let path = match (prefix.is_empty(), path.as_str()) {
                (true, _) => path,
                (false, ".") => prefix.to_string(),
                (false, _) => format!("{prefix} → {path}"),
            };
            Err(GenerateError::MalformedDocument {
                path,
                message: err.into_inner().to_string(),
            })
        }
    }
}
