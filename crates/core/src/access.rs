//! Typed access to parsed sections.
//!
//! Paths are dotted: `technologies.pv.financial.fixed_charge_rate`. The
//! last segment names an entry, the ones before it name subsections.

use rck_protocol::value_models::{Section, Value};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised by typed lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    /// Nothing exists at the path.
    #[error("no value at '{path}'")]
    Missing { path: String },

    /// The value exists but has another type.
    #[error("'{path}' should be {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Section contents do not fit the requested structure.
    #[error("cannot deserialize section: {reason}")]
    Deserialize { reason: String },
}

/// Type alias for Result with AccessError.
pub type AccessResult<T> = Result<T, AccessError>;

/// Typed getters over a section tree.
///
/// Required getters fail with [`AccessError::Missing`] when the path does
/// not exist. The `opt_*` variants return `Ok(None)` for a missing path or
/// a `None` value, but still reject a value of the wrong type.
pub trait TypedAccess {
    fn value_at(&self, path: &str) -> AccessResult<&Value>;

    fn section_required(&self, path: &str) -> AccessResult<&Section>;

    fn str_at(&self, path: &str) -> AccessResult<&str> {
        typed(path, self.value_at(path)?, "string", Value::as_str)
    }

    fn bool_at(&self, path: &str) -> AccessResult<bool> {
        typed(path, self.value_at(path)?, "boolean", Value::as_bool)
    }

    fn i64_at(&self, path: &str) -> AccessResult<i64> {
        typed(path, self.value_at(path)?, "integer", Value::as_i64)
    }

    /// Integers are accepted and widened.
    fn f64_at(&self, path: &str) -> AccessResult<f64> {
        typed(path, self.value_at(path)?, "float", Value::as_f64)
    }

    fn list_at(&self, path: &str) -> AccessResult<&[Value]> {
        typed(path, self.value_at(path)?, "list", Value::as_list)
    }

    fn opt_str_at(&self, path: &str) -> AccessResult<Option<&str>> {
        optional(path, self.value_at(path), "string", Value::as_str)
    }

    fn opt_bool_at(&self, path: &str) -> AccessResult<Option<bool>> {
        optional(path, self.value_at(path), "boolean", Value::as_bool)
    }

    fn opt_i64_at(&self, path: &str) -> AccessResult<Option<i64>> {
        optional(path, self.value_at(path), "integer", Value::as_i64)
    }

    fn opt_f64_at(&self, path: &str) -> AccessResult<Option<f64>> {
        optional(path, self.value_at(path), "float", Value::as_f64)
    }

    fn opt_list_at(&self, path: &str) -> AccessResult<Option<&[Value]>> {
        optional(path, self.value_at(path), "list", Value::as_list)
    }
}

impl TypedAccess for Section {
    fn value_at(&self, path: &str) -> AccessResult<&Value> {
        self.lookup(path).ok_or_else(|| AccessError::Missing {
            path: path.to_string(),
        })
    }

    fn section_required(&self, path: &str) -> AccessResult<&Section> {
        self.section_at(path).ok_or_else(|| AccessError::Missing {
            path: path.to_string(),
        })
    }
}

fn typed<'a, T>(
    path: &str,
    value: &'a Value,
    expected: &'static str,
    get: impl FnOnce(&'a Value) -> Option<T>,
) -> AccessResult<T> {
    get(value).ok_or_else(|| AccessError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: value.type_name(),
    })
}

fn optional<'a, T>(
    path: &str,
    value: AccessResult<&'a Value>,
    expected: &'static str,
    get: impl FnOnce(&'a Value) -> Option<T>,
) -> AccessResult<Option<T>> {
    match value {
        Err(AccessError::Missing { .. }) => Ok(None),
        Err(other) => Err(other),
        Ok(v) if v.is_null() => Ok(None),
        Ok(v) => typed(path, v, expected, get).map(Some),
    }
}

/// Deserialize a section into any serde type.
///
/// The section is first projected to JSON (entries, then subsections as
/// nested objects), so field types follow JSON rules: integers fill float
/// fields and `None` fills `Option` fields.
pub fn extract<T: DeserializeOwned>(section: &Section) -> AccessResult<T> {
    let json = serde_json::to_value(section).map_err(|e| AccessError::Deserialize {
        reason: e.to_string(),
    })?;
    serde_json::from_value(json).map_err(|e| AccessError::Deserialize {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use serde::Deserialize;

    const SRC: &str = "\
[execution_control]
option = local
ppn = 4
walltime = 1.0
feature = None
[technologies]
[[pv]]
capacity_mw = 20
[[[financial]]]
fixed_charge_rate = 0.096
";

    #[test]
    fn test_required_getters() {
        let doc = parse(SRC).unwrap();
        let root = &doc.root;
        assert_eq!(root.str_at("execution_control.option").unwrap(), "local");
        assert_eq!(root.i64_at("execution_control.ppn").unwrap(), 4);
        assert_eq!(root.f64_at("technologies.pv.capacity_mw").unwrap(), 20.0);
        assert_eq!(
            root.f64_at("technologies.pv.financial.fixed_charge_rate").unwrap(),
            0.096
        );
        assert_eq!(
            root.section_required("technologies.pv").unwrap().depth,
            2
        );
    }

    #[test]
    fn test_missing_and_mismatch() {
        let doc = parse(SRC).unwrap();
        let root = &doc.root;
        assert_eq!(
            root.str_at("execution_control.alloc"),
            Err(AccessError::Missing {
                path: "execution_control.alloc".to_string()
            })
        );
        assert_eq!(
            root.i64_at("execution_control.option"),
            Err(AccessError::TypeMismatch {
                path: "execution_control.option".to_string(),
                expected: "integer",
                found: "string",
            })
        );
        assert!(root.section_required("technologies.csp").is_err());
    }

    #[test]
    fn test_optional_getters() {
        let doc = parse(SRC).unwrap();
        let root = &doc.root;
        assert_eq!(root.opt_str_at("execution_control.alloc").unwrap(), None);
        assert_eq!(root.opt_str_at("execution_control.feature").unwrap(), None);
        assert_eq!(root.opt_f64_at("execution_control.walltime").unwrap(), Some(1.0));
        assert!(root.opt_bool_at("execution_control.ppn").is_err());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Financial {
        fixed_charge_rate: f64,
    }

    #[test]
    fn test_extract() {
        let doc = parse(SRC).unwrap();
        let section = doc.section_at("technologies.pv.financial").unwrap();
        let financial: Financial = extract(section).unwrap();
        assert_eq!(financial.fixed_charge_rate, 0.096);

        let err = extract::<Financial>(doc.section("execution_control").unwrap()).unwrap_err();
        assert!(matches!(err, AccessError::Deserialize { .. }));
    }
}
