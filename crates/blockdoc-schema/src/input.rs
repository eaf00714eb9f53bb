//! # Candidate Input Loading
//!
//! Reads block trees from disk. `.yaml`/`.yml` files are parsed as YAML and
//! converted to the equivalent JSON value tree; everything else is parsed
//! as JSON.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Error while reading a candidate document.
#[derive(Error, Debug)]
pub enum InputError {
    /// The file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    Load {
        /// Path of the file.
        path: String,
        /// What went wrong.
        reason: String,
    },
}

impl InputError {
    fn load(path: &Path, reason: String) -> Self {
        Self::Load {
            path: path.display().to_string(),
            reason,
        }
    }
}

/// Load a JSON or YAML file as a JSON value, choosing the parser by
/// extension.
pub fn load_document(path: &Path) -> Result<Value, InputError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| InputError::load(path, format!("cannot read file: {e}")))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => parse_yaml(&content).map_err(|reason| InputError::load(path, reason)),
        _ => serde_json::from_str(&content)
            .map_err(|e| InputError::load(path, format!("invalid JSON: {e}"))),
    }
}

/// Parse YAML text into a JSON value.
pub fn parse_yaml(content: &str) -> Result<Value, String> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))?;
    yaml_to_json_value(&yaml).map_err(|e| format!("YAML-to-JSON conversion failed: {e}"))
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Block trees only use the JSON-compatible subset of YAML. Tags are
/// dropped; non-string scalar keys are stringified.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => Value::Number(json_number(n)?),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Array(
            items
                .iter()
                .map(yaml_to_json_value)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| Ok((json_key(k)?, yaml_to_json_value(v)?)))
                .collect::<Result<_, String>>()?,
        ),
        Yaml::Tagged(tagged) => yaml_to_json_value(&tagged.value)?,
    })
}

// Unsigned first, so ordinals stay `u64` for discriminant reads.
fn json_number(n: &serde_yaml::Number) -> Result<serde_json::Number, String> {
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .ok_or_else(|| format!("number {n} has no JSON representation"))
}

fn json_key(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("unsupported YAML map key: {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_block_converts() {
        let value = parse_yaml(
            "type: Heading\ndata:\n  content: Hi\n  size: 1\n",
        )
        .unwrap();
        assert_eq!(value, json!({"type": "Heading", "data": {"content": "Hi", "size": 1}}));
    }

    #[test]
    fn test_numeric_discriminant_stays_unsigned() {
        let value = parse_yaml("type: 5\n").unwrap();
        assert!(value["type"].is_u64());
    }

    #[test]
    fn test_scalar_keys_stringified() {
        let value = parse_yaml("1: one\ntrue: yes\n").unwrap();
        assert_eq!(value, json!({"1": "one", "true": "yes"}));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let err = parse_yaml("size: .nan\n").unwrap_err();
        assert!(err.contains("no JSON representation"));
    }

    #[test]
    fn test_non_scalar_key_rejected() {
        let err = parse_yaml("? [a, b]\n: 1\n").unwrap_err();
        assert!(err.contains("unsupported YAML map key"));
    }

    #[test]
    fn test_load_document_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("tree.yml");
        std::fs::write(&yaml, "type: Text\n").unwrap();
        let json = dir.path().join("tree.json");
        std::fs::write(&json, r#"{"type": "Text"}"#).unwrap();

        assert_eq!(load_document(&yaml).unwrap(), load_document(&json).unwrap());
    }

    #[test]
    fn test_load_document_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_document(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("broken.json"));
        assert!(msg.contains("invalid JSON"));
    }
}
