//! YAML → JSON transcoder
//!
//! Uses serde_yaml for parsing and serde_json for output:
//! - Only the first document of a stream is converted; an empty stream is `null`
//! - Aliases are resolved and `<<` merge keys applied
//! - Non-string keys are stringified; tags are dropped
//! - Plain scalars resolve by the YAML 1.2 core schema: `yes`/`off` stay
//!   strings and `0755` is the string `"0755"`, not an octal integer
//! - Output is pretty-printed with two-space indent and sorted object keys

use crate::error::{ConvertError, ConvertResult};
use crate::formats::Transcoder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::path::Path;

/// YAML to JSON transcoder
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlToJson;

impl YamlToJson {
    /// Create new transcoder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse the first YAML document of `input` into a JSON value tree
    ///
    /// # Errors
    /// Returns the parser diagnostic, or a description of the value that
    /// has no JSON form.
    pub fn to_value(input: &[u8]) -> Result<JsonValue, String> {
        let mut value = match serde_yaml::Deserializer::from_slice(input).next() {
            Some(doc) => YamlValue::deserialize(doc).map_err(|e| e.to_string())?,
            None => YamlValue::Null,
        };
        value.apply_merge().map_err(|e| e.to_string())?;
        convert(value)
    }
}

impl Transcoder for YamlToJson {
    fn source_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn target_extension(&self) -> &str {
        "json"
    }

    fn transcode(&self, path: &Path, input: &[u8]) -> ConvertResult<Vec<u8>> {
        let value = Self::to_value(input).map_err(|message| ConvertError::transcode(path, message))?;
        serde_json::to_vec_pretty(&value).map_err(|e| ConvertError::transcode(path, e.to_string()))
    }
}

fn convert(value: YamlValue) -> Result<JsonValue, String> {
    Ok(match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => convert_number(&n)?,
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(seq) => {
            JsonValue::Array(seq.into_iter().map(convert).collect::<Result<_, _>>()?)
        }
        YamlValue::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (key, value) in map {
                object.insert(convert_key(key)?, convert(value)?);
            }
            JsonValue::Object(object)
        }
        YamlValue::Tagged(tagged) => convert(tagged.value)?,
    })
}

fn convert_number(n: &serde_yaml::Number) -> Result<JsonValue, String> {
    if let Some(i) = n.as_i64() {
        return Ok(JsonValue::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(JsonValue::from(u));
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(JsonValue::Number)
        .ok_or_else(|| format!("number {n} has no JSON representation"))
}

fn convert_key(key: YamlValue) -> Result<String, String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => convert_key(tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
            Err("mapping key must be a scalar to be converted".to_string())
        }
    }
}
