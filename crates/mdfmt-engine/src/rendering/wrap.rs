//! Column-aware token wrapping with nested line prefixes.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use unicode_width::UnicodeWidthStr;

/// Tokens that open a block when they start a line: bullets, setext
/// underlines, ATX headings, quotes and tilde fences.
static LEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:-+|\++|=+|#+)$|^(?:>|~~~)").expect("leading marker pattern is valid")
});

static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,9}[.)]$").expect("ordered marker pattern is valid"));

/// Escape a token that would be read as a block marker at the start of a
/// line. Anywhere else the token is written unchanged.
fn escape_line_start(token: &str) -> Cow<'_, str> {
    if ORDERED_MARKER.is_match(token) {
        let (number, delimiter) = token.split_at(token.len() - 1);
        Cow::Owned(format!("{number}\\{delimiter}"))
    } else if LEADING_MARKER.is_match(token) {
        Cow::Owned(format!("\\{token}"))
    } else {
        Cow::Borrowed(token)
    }
}

/// Writes whitespace-delimited tokens into a shared buffer, breaking lines
/// at a column budget.
///
/// The first line written starts with `initial_prefix`, every later line with
/// `prefix`. Nested block contexts (quotes, list items) are expressed by
/// [`Wrapper::embed`], which stacks a new prefix pair on top of the parent's
/// continuation prefix.
#[derive(Debug)]
pub struct Wrapper<'a> {
    out: &'a mut String,
    cols: usize,
    count: usize,
    initial_prefix: String,
    prefix: String,
    first_line: bool,
    at_line_start: bool,
}

impl<'a> Wrapper<'a> {
    pub fn new(out: &'a mut String, cols: usize) -> Self {
        Self::with_prefix(out, cols, "", "")
    }

    pub fn with_prefix(
        out: &'a mut String,
        cols: usize,
        initial_prefix: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            out,
            cols,
            count: 0,
            initial_prefix: initial_prefix.into(),
            prefix: prefix.into(),
            first_line: true,
            at_line_start: true,
        }
    }

    /// Derive a wrapper for a nested block. Both prefixes are appended to this
    /// wrapper's continuation prefix; this wrapper's own state is untouched.
    pub fn embed(&mut self, initial_prefix: &str, prefix: &str) -> Wrapper<'_> {
        let initial = format!("{}{}", self.prefix, initial_prefix);
        let following = format!("{}{}", self.prefix, prefix);
        Wrapper::with_prefix(self.out, self.cols, initial, following)
    }

    /// Current continuation prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Write one token. Tokens are never split: one that does not fit the
    /// current line moves to a fresh line, and one wider than the whole
    /// budget is written alone on its line. A token that starts a line and
    /// looks like a block marker (`-`, `#`, `>`, `1.`) has the marker
    /// escaped.
    pub fn write_token(&mut self, token: &str) {
        let width = token.width();

        if self.first_line || self.at_line_start {
            let prefix = if self.first_line {
                &self.initial_prefix
            } else {
                &self.prefix
            };
            let token = escape_line_start(token);
            self.out.push_str(prefix);
            self.out.push_str(&token);
            self.count += prefix.width() + token.width();
            self.first_line = false;
            self.at_line_start = false;
        } else if self.count + width + 1 > self.cols {
            self.break_line();
            self.write_token(token);
            return;
        } else {
            self.out.push(' ');
            self.out.push_str(token);
            self.count += width + 1;
        }

        if self.count > self.cols {
            self.break_line();
        }
    }

    /// Write each non-empty token in order.
    pub fn write_tokens<'t>(&mut self, tokens: impl IntoIterator<Item = &'t str>) {
        for token in tokens {
            if !token.is_empty() {
                self.write_token(token);
            }
        }
    }

    /// End the current line. An empty line still receives its prefix so that
    /// blank lines inside a quote keep the quote marker.
    pub fn newline(&mut self) {
        if self.first_line {
            self.out.push_str(&self.initial_prefix);
            self.count += self.initial_prefix.width();
        } else if self.at_line_start {
            self.out.push_str(&self.prefix);
            self.count += self.prefix.width();
        }
        self.break_line();
    }

    /// End the current line unless it is empty.
    pub fn terminate_line(&mut self) {
        if !self.at_line_start {
            self.newline();
        }
    }

    fn break_line(&mut self) {
        self.out.push('\n');
        self.count = 0;
        self.at_line_start = true;
    }
}
