//! Masking of credentials before a document is printed.

use rck_protocol::value_models::{Document, Section, Value};

/// Replacement written in place of a sensitive value.
pub const MASK: &str = "********";

const SENSITIVE_PARTS: [&str; 4] = ["password", "passwd", "secret", "token"];

/// Whether a key names a credential.
pub fn is_sensitive(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_PARTS.iter().any(|part| key.contains(part)) || key.ends_with("api_key")
}

/// Copy of `doc` with every sensitive value replaced by [`MASK`].
///
/// `None` values are left as they are.
pub fn redact(doc: &Document) -> Document {
    let mut out = doc.clone();
    redact_section(&mut out.root);
    out
}

fn redact_section(section: &mut Section) {
    for (key, value) in section.entries.iter_mut() {
        redact_value(key, value);
    }
    for sub in section.sections.values_mut() {
        redact_section(sub);
    }
}

fn redact_value(key: &str, value: &mut Value) {
    if is_sensitive(key) && !value.is_null() {
        *value = Value::from(MASK);
        return;
    }
    redact_nested(value);
}

/// Walk lists and inline tables at any depth.
fn redact_nested(value: &mut Value) {
    match value {
        Value::Table(map) => {
            for (k, v) in map.iter_mut() {
                redact_value(k, v);
            }
        }
        Value::List(items) => items.iter_mut().for_each(redact_nested),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_sensitive_keys() {
        assert!(is_sensitive("password"));
        assert!(is_sensitive("DB_PASSWD"));
        assert!(is_sensitive("client_secret"));
        assert!(is_sensitive("auth_token"));
        assert!(is_sensitive("nrel_api_key"));
        assert!(!is_sensitive("api_key_hint_url"));
        assert!(!is_sensitive("user"));
    }

    #[test]
    fn test_redact_nested() {
        let doc = parse(
            "[database]\nuser = rev\npassword = \"changeme\"\n\
             [services]\n[[nsrdb]]\nauth = {'token': abc, 'url': x}\nsecret = None\n",
        )
        .unwrap();
        let redacted = redact(&doc);

        assert_eq!(redacted.lookup("database.password"), Some(&Value::from(MASK)));
        assert_eq!(redacted.lookup("database.user"), Some(&Value::from("rev")));
        let auth = redacted.lookup("services.nsrdb.auth").unwrap().as_table().unwrap();
        assert_eq!(auth["token"], Value::from(MASK));
        assert_eq!(auth["url"], Value::from("x"));
        assert_eq!(redacted.lookup("services.nsrdb.secret"), Some(&Value::Null));

        // The input is untouched.
        assert_eq!(doc.lookup("database.password"), Some(&Value::from("changeme")));
    }

    #[test]
    fn test_redact_tables_inside_nested_lists() {
        let doc = parse(
            "[services]\ncreds = [[{'password': 'hunter2'}]]\n\
             mixed = ({'token': 'abc'}, [{'secret': 's3', 'user': 'rev'}])\n",
        )
        .unwrap();
        let redacted = redact(&doc);
        let text = crate::writer::to_string(&redacted).unwrap();

        assert!(!text.contains("hunter2"), "{text}");
        assert!(!text.contains("abc"), "{text}");
        assert!(!text.contains("s3"), "{text}");
        assert!(text.contains("\"user\": \"rev\""), "{text}");

        let creds = redacted.lookup("services.creds").unwrap().as_list().unwrap();
        let inner = creds[0].as_list().unwrap()[0].as_table().unwrap();
        assert_eq!(inner["password"], Value::from(MASK));
    }
}
