//! Document tree models for nested INI configuration files.
//!
//! A configuration file is a tree of named sections. Each section holds
//! scalar, list and inline-table fields plus nested subsections:
//!
//! ```ini
//! name = ri_pv_test
//!
//! [technologies]
//!     [[pv]]
//!     capacity_mw = 20.0
//!         [[[financial]]]
//!         fixed_charge_rate = 0.096
//! ```
//!
//! Both maps keep source order so that a document can be written back in
//! the order it was read.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::Serialize;
use serde::Serializer;
use std::fmt;

/// A single field value.
///
/// `Table` is an inline mapping written as `{key: value, ...}` on one
/// logical line, distinct from a [`Section`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `None` / `null`.
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Ordered sequence, written as `[..]`, `(..)` or `a, b, c`.
    List(Vec<Value>),
    /// Inline mapping.
    Table(IndexMap<String, Value>),
}

impl Value {
    /// Human-readable name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Table(_) => "table",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Table(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    /// Compact, JSON-like rendering for terminal output.
    ///
    /// This is not the INI serialization; see the writer in `rck-core`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Table(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => items.serialize(serializer),
            Value::Table(map) => map.serialize(serializer),
        }
    }
}

/// A named section holding fields and nested subsections.
///
/// `depth` is the number of brackets in the section header: the root has
/// depth 0, `[a]` depth 1, `[[b]]` depth 2 and so on. A child always has
/// its parent's depth plus one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub name: String,
    pub depth: usize,
    pub entries: IndexMap<String, Value>,
    pub sections: IndexMap<String, Section>,
}

impl Section {
    /// Create an empty section.
    pub fn new(name: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            entries: IndexMap::new(),
            sections: IndexMap::new(),
        }
    }

    /// Field value by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Direct subsection by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Descendant section by a dot-separated path relative to this one.
    ///
    /// An empty path returns `self`.
    pub fn section_at(&self, path: &str) -> Option<&Section> {
        if path.is_empty() {
            return Some(self);
        }
        let segments: Vec<&str> = path.split('.').collect();
        self.section_by_segments(&segments)
    }

    /// Descendant section by pre-split path segments.
    pub fn section_by_segments(&self, segments: &[&str]) -> Option<&Section> {
        segments
            .iter()
            .try_fold(self, |section, name| section.section(name))
    }

    /// Field lookup by a dot-separated path, e.g. `"technologies.pv.capacity_mw"`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let segments: Vec<&str> = path.split('.').collect();
        self.lookup_path(&segments)
    }

    /// Field lookup by pre-split path segments. The last segment names the field.
    pub fn lookup_path(&self, segments: &[&str]) -> Option<&Value> {
        let (key, parents) = segments.split_last()?;
        self.section_by_segments(parents)?.get(key)
    }

    /// Depth of the deepest descendant, or this section's depth if it has none.
    pub fn max_depth(&self) -> usize {
        self.sections
            .values()
            .map(Section::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    /// Total number of fields in this section and all descendants.
    pub fn entry_count(&self) -> usize {
        self.entries.len() + self.sections.values().map(Section::entry_count).sum::<usize>()
    }

    /// Total number of descendant sections.
    pub fn section_count(&self) -> usize {
        self.sections.len() + self.sections.values().map(Section::section_count).sum::<usize>()
    }
}

impl Serialize for Section {
    /// Serializes as one map: fields first, then subsections as nested maps.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len() + self.sections.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        for (name, section) in &self.sections {
            map.serialize_entry(name, section)?;
        }
        map.end()
    }
}

/// A parsed configuration file.
///
/// Fields appearing before the first section header belong to the root
/// section, which has an empty name and depth 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub root: Section,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.root.section(name)
    }

    /// Section by a dot-separated path; the empty path is the root.
    pub fn section_at(&self, path: &str) -> Option<&Section> {
        self.root.section_at(path)
    }

    /// Field lookup by a dot-separated path.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.root.lookup(path)
    }

    pub fn lookup_path(&self, segments: &[&str]) -> Option<&Value> {
        self.root.lookup_path(segments)
    }

    /// Deepest section nesting in the document. A document with only
    /// root fields has depth 0.
    pub fn max_depth(&self) -> usize {
        self.root.max_depth()
    }

    /// Iterate top-level sections in source order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.root.sections.values()
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.root.serialize(serializer)
    }
}
