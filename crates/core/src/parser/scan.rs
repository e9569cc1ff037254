//! Comment stripping and bracket tracking across physical lines.
//!
//! A value that opens a list or dict may continue on following lines until
//! every bracket is closed. `BracketTracker` is fed one physical line at a
//! time and reports where the line's content ends (before any `#` comment)
//! and whether the value is still open.
//!
//! A quote only starts a quoted string at the beginning of an item, so bare
//! words such as `don't` are left alone.

/// Tracks open brackets of a value spanning several lines.
#[derive(Debug)]
pub(crate) struct BracketTracker {
    stack: Vec<char>,
    at_item_start: bool,
}

impl BracketTracker {
    pub(crate) fn new() -> Self {
        Self {
            stack: Vec::new(),
            at_item_start: true,
        }
    }

    /// Scan one physical line.
    ///
    /// Returns the byte length of the content before any comment, or the
    /// byte offset of a quote that is not closed on this line.
    pub(crate) fn feed(&mut self, line: &str) -> Result<usize, usize> {
        let mut pos = 0;
        while let Some(c) = line[pos..].chars().next() {
            match c {
                '#' => return Ok(pos),
                '\'' | '"' if self.at_item_start => {
                    let close = line[pos + 1..].find(c).ok_or(pos)?;
                    pos += close + 2;
                    self.at_item_start = false;
                    continue;
                }
                c if c.is_whitespace() => {}
                '[' | '(' | '{' if self.at_item_start || !self.stack.is_empty() => {
                    self.stack.push(c);
                    self.at_item_start = true;
                }
                ']' | ')' | '}' if !self.stack.is_empty() => {
                    self.stack.pop();
                    self.at_item_start = false;
                }
                ',' => self.at_item_start = true,
                ':' if !self.stack.is_empty() => self.at_item_start = true,
                _ => self.at_item_start = false,
            }
            pos += c.len_utf8();
        }
        Ok(line.len())
    }

    /// Whether every opened bracket has been closed.
    pub(crate) fn is_balanced(&self) -> bool {
        self.stack.is_empty()
    }

    /// The innermost bracket still open.
    pub(crate) fn innermost(&self) -> Option<char> {
        self.stack.last().copied()
    }
}

/// Strip a trailing comment from a single line using the same quoting rules.
pub(crate) fn strip_comment(line: &str) -> Result<&str, usize> {
    let end = BracketTracker::new().feed(line)?;
    Ok(&line[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_outside_quotes_is_stripped() {
        assert_eq!(strip_comment("a, b # note"), Ok("a, b "));
        assert_eq!(strip_comment("'a # not a comment' # note"), Ok("'a # not a comment' "));
        assert_eq!(strip_comment("don't # stop"), Ok("don't "));
    }

    #[test]
    fn test_unclosed_quote_reports_offset() {
        assert_eq!(strip_comment("  'abc"), Err(2));
    }

    #[test]
    fn test_brackets_span_lines() {
        let mut tracker = BracketTracker::new();
        assert!(tracker.feed("[[3.0, 4.0],").is_ok());
        assert!(!tracker.is_balanced());
        assert_eq!(tracker.innermost(), Some('['));
        assert!(tracker.feed(" [4.0, 5.0]]  # classes").is_ok());
        assert!(tracker.is_balanced());
    }

    #[test]
    fn test_brackets_inside_bare_words_are_ignored() {
        let mut tracker = BracketTracker::new();
        assert!(tracker.feed("layer[0").is_ok());
        assert!(tracker.is_balanced());
    }
}
