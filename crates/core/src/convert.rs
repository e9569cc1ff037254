//! Render a document in other configuration formats.

use crate::writer::{self, WriteError};
use rck_protocol::value_models::{Document, Section, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output formats supported by [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Ini,
    Json,
    Toml,
    Yaml,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Ini => "ini",
            Format::Json => "json",
            Format::Toml => "toml",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ini" | "cfg" | "conf" => Ok(Format::Ini),
            "json" => Ok(Format::Json),
            "toml" | "tml" => Ok(Format::Toml),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(ConvertError::UnknownFormat(other.to_string())),
        }
    }
}

/// Errors raised while rendering.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unknown format '{0}' (expected ini, json, toml or yaml)")]
    UnknownFormat(String),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),

    /// A value the target format has no form for.
    #[error("{path}: {reason}")]
    Unsupported { path: String, reason: String },
}

/// Type alias for Result with ConvertError.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Render `doc` as `format`.
///
/// TOML has no null, so `None` entries are left out of TOML output; a
/// `None` inside a list cannot be dropped and is an error.
pub fn render(doc: &Document, format: Format) -> ConvertResult<String> {
    match format {
        Format::Ini => Ok(writer::to_string(doc)?),
        Format::Json => {
            let mut out = serde_json::to_string_pretty(doc)?;
            out.push('\n');
            Ok(out)
        }
        Format::Yaml => Ok(serde_yaml::to_string(doc)?),
        Format::Toml => {
            let table = toml_table(&doc.root, "")?;
            Ok(toml::to_string_pretty(&table)?)
        }
    }
}

fn toml_table(section: &Section, path: &str) -> ConvertResult<toml::Table> {
    let mut table = toml::Table::new();
    for (key, value) in &section.entries {
        let child = join(path, key);
        if let Some(v) = toml_value(value, &child)? {
            table.insert(key.clone(), v);
        }
    }
    for (name, sub) in &section.sections {
        let child = join(path, name);
        table.insert(name.clone(), toml::Value::Table(toml_table(sub, &child)?));
    }
    Ok(table)
}

fn toml_value(value: &Value, path: &str) -> ConvertResult<Option<toml::Value>> {
    let converted = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Integer(i) => toml::Value::Integer(*i),
        Value::Float(f) => toml::Value::Float(*f),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::List(items) => {
            let mut array = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                let v = toml_value(item, &item_path)?.ok_or_else(|| ConvertError::Unsupported {
                    path: item_path,
                    reason: "TOML arrays cannot hold None".to_string(),
                })?;
                array.push(v);
            }
            toml::Value::Array(array)
        }
        Value::Table(map) => {
            let mut table = toml::Table::new();
            for (key, item) in map {
                if let Some(v) = toml_value(item, &join(path, key))? {
                    table.insert(key.clone(), v);
                }
            }
            toml::Value::Table(table)
        }
    };
    Ok(Some(converted))
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const SRC: &str = "\
[execution_control]
option = local
feature = None
[technologies]
[[pv]]
capacity_mw = 20.0
bins = [[3.0, 4.0], [4.0, 5.0]]
";

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("cfg".parse::<Format>().unwrap(), Format::Ini);
        assert!(matches!(
            "xml".parse::<Format>(),
            Err(ConvertError::UnknownFormat(ref f)) if f == "xml"
        ));
    }

    #[test]
    fn test_render_json() {
        let doc = parse(SRC).unwrap();
        let out = render(&doc, Format::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["execution_control"]["feature"], serde_json::Value::Null);
        assert_eq!(json["technologies"]["pv"]["bins"][1][0], 4.0);
    }

    #[test]
    fn test_render_toml_drops_null() {
        let doc = parse(SRC).unwrap();
        let out = render(&doc, Format::Toml).unwrap();
        let table: toml::Table = toml::from_str(&out).unwrap();
        let exec = table["execution_control"].as_table().unwrap();
        assert_eq!(exec["option"].as_str(), Some("local"));
        assert!(!exec.contains_key("feature"));
        assert_eq!(
            table["technologies"]["pv"]["capacity_mw"].as_float(),
            Some(20.0)
        );
    }

    #[test]
    fn test_render_toml_rejects_null_in_list() {
        let doc = parse("[a]\nrange = (None, 5)\n").unwrap();
        match render(&doc, Format::Toml) {
            Err(ConvertError::Unsupported { path, .. }) => assert_eq!(path, "a.range[0]"),
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_render_yaml() {
        let doc = parse(SRC).unwrap();
        let out = render(&doc, Format::Yaml).unwrap();
        let yaml: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(yaml["execution_control"]["option"].as_str(), Some("local"));
        assert!(yaml["execution_control"]["feature"].is_null());
    }
}
