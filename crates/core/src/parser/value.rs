//! Value literal grammar.
//!
//! Operates on the logical value text of one assignment, i.e. everything
//! after `=` with comments removed, possibly spanning several lines.
//!
//! ```text
//! value    := <empty> | ',' | element | element (',' element?)*
//! element  := quoted | '[' seq ']' | '(' seq ')' | '{' dict '}' | bare
//! seq      := (element (',' element)* ','?)?
//! dict     := (key ':' element (',' key ':' element)* ','?)?
//! ```

use super::error::ParseErrorKind;
use indexmap::IndexMap;
use rck_protocol::value_models::Value;

/// Error at a byte offset into the value text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValueError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub message: String,
}

impl ValueError {
    fn new(kind: ParseErrorKind, offset: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            offset,
            message: message.into(),
        }
    }
}

type ValueResult<T> = Result<T, ValueError>;

/// Where an element appears; decides which characters end a bare word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Top,
    Seq,
    Dict,
}

/// Parse the value text of an assignment.
pub(crate) fn parse_value(src: &str) -> ValueResult<Value> {
    let mut scanner = Scanner { src, pos: 0 };
    scanner.top()
}

/// Infer the type of an unquoted scalar.
pub(crate) fn infer_scalar(text: &str) -> Value {
    match text.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "none" | "null" => return Value::Null,
        _ => {}
    }
    if looks_like_integer(text) {
        if let Ok(i) = text.parse::<i64>() {
            return Value::Integer(i);
        }
    }
    if looks_like_float(text) {
        if let Ok(f) = text.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::String(text.to_string())
}

fn looks_like_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn looks_like_float(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        && text
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.'))
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn top(&mut self) -> ValueResult<Value> {
        self.skip_ws();
        if self.at_end() {
            return Ok(Value::String(String::new()));
        }
        if self.peek() == Some(',') {
            self.bump();
            self.skip_ws();
            if self.at_end() {
                return Ok(Value::List(Vec::new()));
            }
            return Err(ValueError::new(
                ParseErrorKind::UnexpectedCharacter,
                self.pos,
                "a leading comma is only allowed as the empty list",
            ));
        }

        let first = self.element(Context::Top)?;
        self.skip_ws();
        if self.at_end() {
            return Ok(first);
        }
        if self.peek() != Some(',') {
            return Err(ValueError::new(
                ParseErrorKind::TrailingCharacters,
                self.pos,
                "unexpected text after value",
            ));
        }

        let mut items = vec![first];
        while self.peek() == Some(',') {
            self.bump();
            self.skip_ws();
            if self.at_end() {
                break;
            }
            items.push(self.element(Context::Top)?);
            self.skip_ws();
            if !self.at_end() && self.peek() != Some(',') {
                return Err(ValueError::new(
                    ParseErrorKind::TrailingCharacters,
                    self.pos,
                    "expected ',' between list items",
                ));
            }
        }
        Ok(Value::List(items))
    }

    fn element(&mut self, ctx: Context) -> ValueResult<Value> {
        match self.peek() {
            Some(q @ ('\'' | '"')) => self.quoted(q).map(Value::String),
            Some('[') => self.seq(']'),
            Some('(') => self.seq(')'),
            Some('{') => self.dict(),
            _ => self.bare(ctx),
        }
    }

    fn quoted(&mut self, quote: char) -> ValueResult<String> {
        let start = self.pos;
        self.bump();
        let rest = &self.src[self.pos..];
        let close = rest.find(quote).ok_or_else(|| {
            ValueError::new(
                ParseErrorKind::UnterminatedString,
                start,
                format!("missing closing {quote}"),
            )
        })?;
        let content = rest[..close].to_string();
        self.pos += close + quote.len_utf8();
        Ok(content)
    }

    fn seq(&mut self, close: char) -> ValueResult<Value> {
        let open = self.pos;
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(Value::List(items));
            }
            if self.at_end() {
                return Err(unterminated_list(open));
            }
            items.push(self.element(Context::Seq)?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok(Value::List(items));
                }
                None => return Err(unterminated_list(open)),
                Some(c) => {
                    return Err(ValueError::new(
                        ParseErrorKind::UnexpectedCharacter,
                        self.pos,
                        format!("expected ',' or '{close}', found '{c}'"),
                    ))
                }
            }
        }
    }

    fn dict(&mut self) -> ValueResult<Value> {
        let open = self.pos;
        self.bump();
        let mut map = IndexMap::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Table(map));
            }
            if self.at_end() {
                return Err(unterminated_dict(open));
            }

            let key_pos = self.pos;
            let key = match self.peek() {
                Some(q @ ('\'' | '"')) => self.quoted(q)?,
                _ => self.bare_key()?,
            };
            self.skip_ws();
            match self.bump() {
                Some(':') => {}
                None => return Err(unterminated_dict(open)),
                Some(c) => {
                    return Err(ValueError::new(
                        ParseErrorKind::UnexpectedCharacter,
                        self.pos - c.len_utf8(),
                        format!("expected ':' after key \"{key}\", found '{c}'"),
                    ))
                }
            }
            self.skip_ws();
            if self.at_end() {
                return Err(unterminated_dict(open));
            }
            let value = self.element(Context::Dict)?;
            if map.contains_key(&key) {
                return Err(ValueError::new(
                    ParseErrorKind::DuplicateKey,
                    key_pos,
                    format!("duplicate key \"{key}\" in inline dict"),
                ));
            }
            map.insert(key, value);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    return Ok(Value::Table(map));
                }
                None => return Err(unterminated_dict(open)),
                Some(c) => {
                    return Err(ValueError::new(
                        ParseErrorKind::UnexpectedCharacter,
                        self.pos,
                        format!("expected ',' or '}}', found '{c}'"),
                    ))
                }
            }
        }
    }

    fn bare(&mut self, ctx: Context) -> ValueResult<Value> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let ends = match ctx {
                Context::Top => c == ',',
                Context::Seq | Context::Dict => matches!(c, ',' | ']' | ')' | '}'),
            };
            if ends {
                break;
            }
            if ctx != Context::Top && matches!(c, '[' | '(' | '{' | '\'' | '"') {
                return Err(ValueError::new(
                    ParseErrorKind::UnexpectedCharacter,
                    self.pos,
                    format!("unexpected '{c}' inside an unquoted value"),
                ));
            }
            self.bump();
        }
        let text = self.src[start..self.pos].trim();
        if text.is_empty() {
            return Err(ValueError::new(
                ParseErrorKind::UnexpectedCharacter,
                start,
                "expected a value",
            ));
        }
        Ok(infer_scalar(text))
    }

    fn bare_key(&mut self) -> ValueResult<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ':' | ',' | '}') {
                break;
            }
            self.bump();
        }
        let key = self.src[start..self.pos].trim();
        if key.is_empty() {
            return Err(ValueError::new(
                ParseErrorKind::EmptyName,
                start,
                "empty key in inline dict",
            ));
        }
        Ok(key.to_string())
    }
}

fn unterminated_list(open: usize) -> ValueError {
    ValueError::new(ParseErrorKind::UnterminatedList, open, "list is never closed")
}

fn unterminated_dict(open: usize) -> ValueError {
    ValueError::new(ParseErrorKind::UnterminatedDict, open, "dict is never closed")
}
