//! Nested INI parser.
//!
//! Turns configuration text into a [`Document`]. The format is line
//! oriented and indentation is insignificant:
//!
//! ```ini
//! # comment
//! root_key = value
//!
//! [section]
//! key = value            # inline comment
//! list = a, b, c
//!     [[subsection]]
//!     table = {'units': 'kWh', 'scale_factor': 1}
//!     bins = [[3.0, 4.0],
//!             [4.0, 5.0]]
//! ```
//!
//! A header with `n` brackets opens a section at depth `n`, which must be
//! at most one deeper than the section currently open.

pub mod error;
mod scan;
mod value;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub(crate) use value::infer_scalar;

use rck_protocol::value_models::{Document, Section, Value};
use scan::{strip_comment, BracketTracker};
use tracing::debug;

/// What to do when a section header repeats under the same parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`ParseErrorKind::DuplicateSection`].
    #[default]
    Reject,
    /// Re-open the earlier section and keep adding to it. Keys must still
    /// be unique across both occurrences.
    Merge,
}

/// Parser settings.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub duplicate_sections: DuplicatePolicy,
}

/// Parse a document with default options.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the 1-based line and column of the
/// first problem found.
///
/// # Example
///
/// ```
/// use rck_core::parser::parse;
///
/// let doc = parse("[project]\nname = ri_pv_test\n").unwrap();
/// assert_eq!(doc.lookup("project.name").and_then(|v| v.as_str()), Some("ri_pv_test"));
/// ```
pub fn parse(src: &str) -> ParseResult<Document> {
    parse_with(src, &ParseOptions::default())
}

/// Parse a document with explicit options.
pub fn parse_with(src: &str, options: &ParseOptions) -> ParseResult<Document> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let mut parser = Parser::new(src, options);
    parser.run()?;
    let doc = parser.finish();
    debug!(
        sections = doc.root.section_count(),
        entries = doc.root.entry_count(),
        max_depth = doc.max_depth(),
        "parsed document"
    );
    Ok(doc)
}

/// An open section and, when it was re-opened by a merge, its former index
/// in the parent.
struct Frame {
    section: Section,
    index: Option<usize>,
}

struct Parser<'a> {
    lines: Vec<&'a str>,
    next: usize,
    options: &'a ParseOptions,
    /// Open sections; the root is always at the bottom.
    stack: Vec<Frame>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            lines: src.lines().collect(),
            next: 0,
            options,
            stack: vec![Frame {
                section: Section::new("", 0),
                index: None,
            }],
        }
    }

    fn run(&mut self) -> ParseResult<()> {
        while let Some((line_no, line)) = self.next_line() {
            let trimmed = line.trim_start();
            let indent = line.len() - trimmed.len();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('[') {
                self.header(line_no, indent, trimmed)?;
            } else {
                self.assignment(line_no, indent, trimmed)?;
            }
        }
        Ok(())
    }

    /// Close every open section and return the root.
    fn finish(mut self) -> Document {
        while self.stack.len() > 1 {
            self.close_section();
        }
        let root = self
            .stack
            .pop()
            .map(|frame| frame.section)
            .unwrap_or_default();
        Document { root }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.get(self.next).copied()?;
        self.next += 1;
        Some((self.next, line))
    }

    fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn current(&mut self) -> &mut Section {
        let top = self.stack.len() - 1;
        &mut self.stack[top].section
    }

    fn close_section(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let parent = self.current();
        let name = frame.section.name.clone();
        match frame.index {
            Some(index) => {
                parent.sections.shift_insert(index, name, frame.section);
            }
            None => {
                parent.sections.insert(name, frame.section);
            }
        }
    }

    fn header(&mut self, line_no: usize, indent: usize, text: &str) -> ParseResult<()> {
        let column = indent + 1;
        let depth = text.chars().take_while(|&c| c == '[').count();
        let rest = &text[depth..];

        let (name, after_name) = match rest.trim_start().chars().next() {
            Some(q @ ('\'' | '"')) => {
                let inner = rest.trim_start();
                let close = inner[1..].find(q).ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::UnterminatedString,
                        line_no,
                        column,
                        "section name quote is never closed",
                    )
                })?;
                (inner[1..close + 1].to_string(), inner[close + 2..].trim_start())
            }
            _ => {
                let end = rest.find(']').ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::MismatchedBrackets,
                        line_no,
                        column,
                        "section header is never closed",
                    )
                })?;
                (rest[..end].trim().to_string(), &rest[end..])
            }
        };

        let closing = after_name.chars().take_while(|&c| c == ']').count();
        if closing != depth {
            return Err(ParseError::new(
                ParseErrorKind::MismatchedBrackets,
                line_no,
                column,
                format!("header opens with {depth} brackets but closes with {closing}"),
            ));
        }
        let trailing = strip_comment(&after_name[closing..]).map_err(|offset| {
            ParseError::new(
                ParseErrorKind::UnterminatedString,
                line_no,
                column + text.len() - after_name.len() + closing + offset,
                "quote is never closed",
            )
        })?;
        if !trailing.trim().is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::TrailingCharacters,
                line_no,
                column,
                format!("unexpected text after section header: \"{}\"", trailing.trim()),
            ));
        }
        if name.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::EmptyName,
                line_no,
                column,
                "section name is empty",
            ));
        }
        if depth > self.depth() + 1 {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep,
                line_no,
                column,
                format!(
                    "section \"{name}\" at depth {depth} cannot follow depth {}",
                    self.depth()
                ),
            ));
        }

        while self.depth() >= depth {
            self.close_section();
        }
        self.open_section(line_no, column, name, depth)
    }

    fn open_section(
        &mut self,
        line_no: usize,
        column: usize,
        name: String,
        depth: usize,
    ) -> ParseResult<()> {
        let policy = self.options.duplicate_sections;
        let parent = self.current();
        if parent.entries.contains_key(&name) {
            return Err(ParseError::new(
                ParseErrorKind::NameConflict,
                line_no,
                column,
                format!("\"{name}\" is already a key in this section"),
            ));
        }

        let frame = match parent.sections.shift_remove_full(&name) {
            None => Frame {
                section: Section::new(name, depth),
                index: None,
            },
            Some((index, key, existing)) => match policy {
                DuplicatePolicy::Merge => {
                    debug!(section = %key, line = line_no, "re-opening duplicate section");
                    Frame {
                        section: existing,
                        index: Some(index),
                    }
                }
                DuplicatePolicy::Reject => {
                    parent.sections.shift_insert(index, key, existing);
                    return Err(ParseError::new(
                        ParseErrorKind::DuplicateSection,
                        line_no,
                        column,
                        format!("section \"{name}\" is defined more than once"),
                    ));
                }
            },
        };
        self.stack.push(frame);
        Ok(())
    }

    fn assignment(&mut self, line_no: usize, indent: usize, text: &'a str) -> ParseResult<()> {
        let column = indent + 1;
        let (key, value_text) = split_assignment(text).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::InvalidLine,
                line_no,
                column,
                format!(
                    "expected 'key = value' or a section header, found \"{}\"",
                    text.trim_end()
                ),
            )
        })?;
        let key = unquote_key(key.trim()).ok_or_else(|| {
            ParseError::new(ParseErrorKind::EmptyName, line_no, column, "key is empty")
        })?;

        let value_column = column + (text.len() - value_text.len());
        let value = self.value(line_no, value_column, value_text)?;

        let section = self.current();
        if section.entries.contains_key(&key) {
            return Err(ParseError::new(
                ParseErrorKind::DuplicateKey,
                line_no,
                column,
                format!("duplicate key \"{key}\""),
            ));
        }
        if section.sections.contains_key(&key) {
            return Err(ParseError::new(
                ParseErrorKind::NameConflict,
                line_no,
                column,
                format!("\"{key}\" is already a subsection of this section"),
            ));
        }
        section.entries.insert(key, value);
        Ok(())
    }

    /// Assemble the logical value text, pulling continuation lines as needed,
    /// and parse it.
    fn value(&mut self, line_no: usize, column: usize, text: &'a str) -> ParseResult<Value> {
        let trimmed = text.trim_start();
        for quote in ["'''", "\"\"\""] {
            if trimmed.starts_with(quote) {
                let column = column + text.len() - trimmed.len();
                return self.triple_quoted(line_no, column, quote, &trimmed[quote.len()..]);
            }
        }

        let mut tracker = BracketTracker::new();
        let end = tracker
            .feed(text)
            .map_err(|offset| unterminated_quote(line_no, column + offset))?;
        let mut logical = text[..end].to_string();

        while !tracker.is_balanced() {
            let Some((cont_no, cont)) = self.next_line() else {
                let (kind, what) = match tracker.innermost() {
                    Some('{') => (ParseErrorKind::UnterminatedDict, "dict"),
                    _ => (ParseErrorKind::UnterminatedList, "list"),
                };
                return Err(ParseError::new(
                    kind,
                    line_no,
                    column,
                    format!("{what} opened here is never closed"),
                ));
            };
            let end = tracker
                .feed(cont)
                .map_err(|offset| unterminated_quote(cont_no, offset + 1))?;
            logical.push('\n');
            logical.push_str(&cont[..end]);
        }

        value::parse_value(&logical).map_err(|err| {
            let before = &logical[..err.offset];
            let (line, col) = match before.rfind('\n') {
                Some(nl) => (
                    line_no + before.matches('\n').count(),
                    err.offset - nl,
                ),
                None => (line_no, column + err.offset),
            };
            ParseError::new(err.kind, line, col, err.message)
        })
    }

    fn triple_quoted(
        &mut self,
        line_no: usize,
        column: usize,
        quote: &str,
        first: &'a str,
    ) -> ParseResult<Value> {
        let mut content = String::new();
        let mut current = first;
        let mut current_no = line_no;
        loop {
            if let Some(close) = current.find(quote) {
                content.push_str(&current[..close]);
                let rest = &current[close + quote.len()..];
                let trailing = strip_comment(rest)
                    .map_err(|offset| unterminated_quote(current_no, offset + 1))?;
                if !trailing.trim().is_empty() {
                    return Err(ParseError::new(
                        ParseErrorKind::TrailingCharacters,
                        current_no,
                        column,
                        "unexpected text after closing triple quote",
                    ));
                }
                return Ok(Value::String(content));
            }
            content.push_str(current);
            content.push('\n');
            let Some((next_no, next)) = self.next_line() else {
                return Err(ParseError::new(
                    ParseErrorKind::UnterminatedString,
                    line_no,
                    column,
                    format!("{quote} string is never closed"),
                ));
            };
            current = next;
            current_no = next_no;
        }
    }
}

fn unterminated_quote(line: usize, column: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnterminatedString,
        line,
        column,
        "quote is never closed",
    )
}

/// Split `key = value` at the first `=` outside a quoted key.
fn split_assignment(text: &str) -> Option<(&str, &str)> {
    let search_from = match text.chars().next() {
        Some(q @ ('\'' | '"')) => text[1..].find(q)? + 2,
        _ => 0,
    };
    let eq = text[search_from..].find('=')? + search_from;
    Some((&text[..eq], &text[eq + 1..]))
}

fn unquote_key(key: &str) -> Option<String> {
    let unquoted = match key.chars().next() {
        Some(q @ ('\'' | '"')) if key.len() >= 2 && key.ends_with(q) => &key[1..key.len() - 1],
        _ => key,
    };
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Document {
        parse(src).expect("document should parse")
    }

    fn parse_err(src: &str) -> ParseError {
        parse(src).expect_err("document should fail to parse")
    }

    #[test]
    fn test_root_entries_and_sections() {
        let doc = parse_ok(
            "name = top\n\
             [project]\n\
             tech = pv\n\
             [database]\n\
             port = 5432\n",
        );
        assert_eq!(doc.lookup("name"), Some(&Value::from("top")));
        assert_eq!(doc.lookup("project.tech"), Some(&Value::from("pv")));
        assert_eq!(doc.lookup("database.port"), Some(&Value::Integer(5432)));
        let names: Vec<&str> = doc.sections().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["project", "database"]);
    }

    #[test]
    fn test_nesting_and_closing() {
        let doc = parse_ok(
            "[a]\n\
             [[b]]\n\
             [[[c]]]\n\
             x = 1\n\
             [[d]]\n\
             y = 2\n\
             [e]\n\
             z = 3\n",
        );
        assert_eq!(doc.lookup("a.b.c.x"), Some(&Value::Integer(1)));
        assert_eq!(doc.lookup("a.d.y"), Some(&Value::Integer(2)));
        assert_eq!(doc.lookup("e.z"), Some(&Value::Integer(3)));
        assert_eq!(doc.section_at("a.b.c").map(|s| s.depth), Some(3));
        assert_eq!(doc.max_depth(), 3);
    }

    #[test]
    fn test_indentation_is_insignificant() {
        let flat = parse_ok("[a]\n[[b]]\nx = 1\n");
        let indented = parse_ok("[a]\n    [[b]]\n        x = 1\n");
        assert_eq!(flat, indented);
    }

    #[test]
    fn test_comments_do_not_change_values() {
        let plain = parse_ok("[a]\nx = 1, 2\ny = 'v # w'\n");
        let commented = parse_ok(
            "# header comment\n\
             [a] # trailing\n\
             # between\n\
             x = 1, 2 # after a list\n\
             y = 'v # w'   # after a string\n",
        );
        assert_eq!(plain, commented);
    }

    #[test]
    fn test_multiline_list_with_comments() {
        let doc = parse_ok(
            "bins = [[3.0, 4.0],  # first\n\
             \x20       # a comment line inside the list\n\
             \x20       [4.0, 5.0]]\n\
             after = 1\n",
        );
        let bins = doc.lookup("bins").and_then(Value::as_list).expect("bins list");
        assert_eq!(bins.len(), 2);
        assert_eq!(doc.lookup("after"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_triple_quoted_string() {
        let doc = parse_ok("note = '''first\nsecond # kept'''  # dropped\nnext = 1\n");
        assert_eq!(doc.lookup("note"), Some(&Value::from("first\nsecond # kept")));
        assert_eq!(doc.lookup("next"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_quoted_keys_and_names() {
        let doc = parse_ok("[\"my section\"]\n'odd = key' = yes\n");
        assert_eq!(
            doc.section("my section").and_then(|s| s.get("odd = key")),
            Some(&Value::from("yes"))
        );
    }

    #[test]
    fn test_empty_value_is_empty_string() {
        let doc = parse_ok("[a]\nfeature =\n");
        assert_eq!(doc.lookup("a.feature"), Some(&Value::from("")));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = parse_err("[a]\nx = 1\nx = 2\n");
        assert_eq!(err.kind, ParseErrorKind::DuplicateKey);
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_same_key_in_sibling_sections() {
        let doc = parse_ok("[a]\nx = 1\n[b]\nx = 2\n");
        assert_eq!(doc.lookup("a.x"), Some(&Value::Integer(1)));
        assert_eq!(doc.lookup("b.x"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_duplicate_section_rejected_by_default() {
        let err = parse_err("[a]\nx = 1\n[b]\n[a]\ny = 2\n");
        assert_eq!(err.kind, ParseErrorKind::DuplicateSection);
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_duplicate_section_merged() {
        let options = ParseOptions {
            duplicate_sections: DuplicatePolicy::Merge,
        };
        let doc = parse_with("[a]\nx = 1\n[b]\n[a]\ny = 2\n", &options).expect("merge");
        assert_eq!(doc.lookup("a.x"), Some(&Value::Integer(1)));
        assert_eq!(doc.lookup("a.y"), Some(&Value::Integer(2)));
        let names: Vec<&str> = doc.sections().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);

        let err = parse_with("[a]\nx = 1\n[a]\nx = 2\n", &options).expect_err("dup key");
        assert_eq!(err.kind, ParseErrorKind::DuplicateKey);
    }

    #[test]
    fn test_header_errors() {
        assert_eq!(parse_err("[[a]\n").kind, ParseErrorKind::MismatchedBrackets);
        assert_eq!(parse_err("[a]]\n").kind, ParseErrorKind::MismatchedBrackets);
        assert_eq!(parse_err("[a\n").kind, ParseErrorKind::MismatchedBrackets);
        assert_eq!(parse_err("[ ]\n").kind, ParseErrorKind::EmptyName);
        assert_eq!(parse_err("[a] x\n").kind, ParseErrorKind::TrailingCharacters);

        let err = parse_err("[a]\n[[[c]]]\n");
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_name_conflicts() {
        assert_eq!(parse_err("[a]\nb = 1\n[[b]]\n").kind, ParseErrorKind::NameConflict);
        let options = ParseOptions {
            duplicate_sections: DuplicatePolicy::Merge,
        };
        let err = parse_with("[a]\n[[b]]\n[a]\nb = 1\n", &options).expect_err("conflict");
        assert_eq!(err.kind, ParseErrorKind::NameConflict);
    }

    #[test]
    fn test_invalid_line() {
        let err = parse_err("[a]\njust some words\n");
        assert_eq!(err.kind, ParseErrorKind::InvalidLine);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 1);
    }

    #[test]
    fn test_unterminated_values() {
        let err = parse_err("[a]\nbins = [[1, 2],\n  [3, 4]\n");
        assert_eq!(err.kind, ParseErrorKind::UnterminatedList);
        assert_eq!(err.line, 2);

        assert_eq!(parse_err("t = {'a': 1,\n").kind, ParseErrorKind::UnterminatedDict);
        assert_eq!(parse_err("s = 'open\n").kind, ParseErrorKind::UnterminatedString);
        assert_eq!(parse_err("s = '''open\nmore\n").kind, ParseErrorKind::UnterminatedString);
    }

    #[test]
    fn test_value_error_location() {
        let err = parse_err("[a]\n  x = [1, 2) \n");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedCharacter);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 12);
    }

    #[test]
    fn test_crlf_and_bom() {
        let doc = parse_ok("\u{feff}[a]\r\nx = 1\r\n");
        assert_eq!(doc.lookup("a.x"), Some(&Value::Integer(1)));
    }
}
