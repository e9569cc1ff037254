//! Serialize a [`Document`] back to nested INI text.
//!
//! Output is canonical rather than a copy of the original layout: comments
//! are gone, lists use bracket notation and every section header is
//! preceded by a blank line. Parsing the output yields an equal document.

use crate::parser::infer_scalar;
use rck_protocol::value_models::{Document, Section, Value};
use thiserror::Error;

/// Errors raised when a value has no textual form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WriteError {
    /// NaN and infinities cannot be written back as floats.
    #[error("{path}: non-finite float {value}")]
    NonFiniteFloat { path: String, value: f64 },

    /// A string or name that no quoting style can hold.
    #[error("{path}: cannot quote {text:?}")]
    Unrepresentable { path: String, text: String },

    /// A name used for both a key and a subsection of one section.
    #[error("{path}: name is used by both a key and a subsection")]
    NameConflict { path: String },
}

/// Type alias for Result with WriteError.
pub type WriteResult<T> = Result<T, WriteError>;

/// Writer settings.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Indentation added per nesting level.
    pub indent: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }
}

/// Write a document with default options.
pub fn to_string(doc: &Document) -> WriteResult<String> {
    to_string_with(doc, &WriteOptions::default())
}

/// Write a document with explicit options.
pub fn to_string_with(doc: &Document, options: &WriteOptions) -> WriteResult<String> {
    let mut writer = Writer {
        out: String::new(),
        options,
        path: Vec::new(),
    };
    writer.entries(&doc.root, 0)?;
    for section in doc.root.sections.values() {
        writer.section(section, 1)?;
    }
    Ok(writer.out)
}

struct Writer<'a> {
    out: String,
    options: &'a WriteOptions,
    path: Vec<String>,
}

impl Writer<'_> {
    fn section(&mut self, section: &Section, depth: usize) -> WriteResult<()> {
        self.path.push(section.name.clone());
        let name = self.header_name(&section.name)?;

        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push_str(&self.options.indent.repeat(depth - 1));
        self.out.push_str(&"[".repeat(depth));
        self.out.push_str(&name);
        self.out.push_str(&"]".repeat(depth));
        self.out.push('\n');

        self.entries(section, depth)?;
        for child in section.sections.values() {
            self.section(child, depth + 1)?;
        }
        self.path.pop();
        Ok(())
    }

    fn entries(&mut self, section: &Section, depth: usize) -> WriteResult<()> {
        let indent = self.options.indent.repeat(depth);
        for (key, value) in &section.entries {
            let path = self.key_path(key);
            if section.sections.contains_key(key) {
                return Err(WriteError::NameConflict { path });
            }
            let key_text = key_repr(key).ok_or_else(|| WriteError::Unrepresentable {
                path: path.clone(),
                text: key.clone(),
            })?;
            let value_text = top_value_repr(value, &path)?;
            self.out.push_str(&indent);
            self.out.push_str(&key_text);
            self.out.push_str(" = ");
            self.out.push_str(&value_text);
            self.out.push('\n');
        }
        Ok(())
    }

    fn key_path(&self, key: &str) -> String {
        let mut parts = self.path.clone();
        parts.push(key.to_string());
        parts.join(".")
    }

    fn header_name(&self, name: &str) -> WriteResult<String> {
        let bare = !name.is_empty()
            && name == name.trim()
            && !name.contains(['[', ']', '#', '\n'])
            && !name.starts_with(['\'', '"']);
        if bare {
            return Ok(name.to_string());
        }
        quote_single_line(name)
            .filter(|_| !name.is_empty())
            .ok_or_else(|| WriteError::Unrepresentable {
                path: self.path.join("."),
                text: name.to_string(),
            })
    }
}

fn key_repr(key: &str) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    let bare = key == key.trim()
        && !key.contains(['=', '\n'])
        && !key.starts_with(['\'', '"', '[', '#', '\u{feff}']);
    if bare {
        Some(key.to_string())
    } else {
        quote_single_line(key)
    }
}

/// Wrap text in whichever single-line quote it does not contain.
fn quote_single_line(text: &str) -> Option<String> {
    if text.contains('\n') {
        None
    } else if !text.contains('"') {
        Some(format!("\"{text}\""))
    } else if !text.contains('\'') {
        Some(format!("'{text}'"))
    } else {
        None
    }
}

fn top_value_repr(value: &Value, path: &str) -> WriteResult<String> {
    match value {
        Value::String(s) => top_string_repr(s).ok_or_else(|| WriteError::Unrepresentable {
            path: path.to_string(),
            text: s.clone(),
        }),
        other => nested_value_repr(other, path),
    }
}

/// A top-level string is written bare when parsing it back gives the same
/// string, otherwise quoted, with triple quotes for multi-line text.
fn top_string_repr(s: &str) -> Option<String> {
    let bare = !s.is_empty()
        && s == s.trim()
        && !s.contains([',', '#', '\n'])
        && !s.starts_with(['\'', '"', '[', '(', '{'])
        && matches!(infer_scalar(s), Value::String(ref t) if t == s);
    if bare {
        return Some(s.to_string());
    }
    if !s.contains('\n') {
        if let Some(quoted) = quote_single_line(s) {
            return Some(quoted);
        }
    }
    // Line splitting drops a carriage return that precedes a newline.
    if s.contains("\r\n") {
        return None;
    }
    for quote in ["'''", "\"\"\""] {
        let last = quote.chars().next().unwrap_or('\'');
        if !s.contains(quote) && !s.ends_with(last) {
            return Some(format!("{quote}{s}{quote}"));
        }
    }
    None
}

fn nested_value_repr(value: &Value, path: &str) -> WriteResult<String> {
    match value {
        Value::Null => Ok("None".to_string()),
        Value::Bool(true) => Ok("True".to_string()),
        Value::Bool(false) => Ok("False".to_string()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) if f.is_finite() => Ok(format!("{f:?}")),
        Value::Float(f) => Err(WriteError::NonFiniteFloat {
            path: path.to_string(),
            value: *f,
        }),
        Value::String(s) => quote_single_line(s).ok_or_else(|| WriteError::Unrepresentable {
            path: path.to_string(),
            text: s.clone(),
        }),
        Value::List(items) => {
            let parts = items
                .iter()
                .map(|item| nested_value_repr(item, path))
                .collect::<WriteResult<Vec<_>>>()?;
            Ok(format!("[{}]", parts.join(", ")))
        }
        Value::Table(map) => {
            let mut parts = Vec::with_capacity(map.len());
            for (key, item) in map {
                let key_text =
                    quote_single_line(key).ok_or_else(|| WriteError::Unrepresentable {
                        path: path.to_string(),
                        text: key.clone(),
                    })?;
                parts.push(format!("{key_text}: {}", nested_value_repr(item, path)?));
            }
            Ok(format!("{{{}}}", parts.join(", ")))
        }
    }
}
