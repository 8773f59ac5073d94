//! Compiles runs of inline nodes into canonical markdown text.

use std::sync::LazyLock;

use regex::Regex;

use super::error::{RenderError, Result};
use crate::models::{Node, NodeKind};

static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(" {2,}").expect("space run pattern is valid"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("entity pattern is valid")
});

/// Destinations that can be written in `<...>` autolink form.
static AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*$").expect("autolink pattern is valid")
});

/// Collapse runs of spaces (and line breaks) into single spaces.
pub fn flatten_spaces(text: &str) -> String {
    let text = text.replace('\n', " ");
    SPACE_RUNS.replace_all(&text, " ").into_owned()
}

/// [`flatten_spaces`], then strip leading and trailing whitespace.
pub fn trim_flatten_spaces(text: &str) -> String {
    flatten_spaces(text).trim().to_string()
}

/// Backslash-escape every character of plain text that a parser would read
/// back as markup.
///
/// Backslashes, asterisks, backticks and square brackets are always escaped.
/// An underscore is left alone between two alphanumerics, where it cannot
/// delimit emphasis. `<` is escaped only where it could open a tag or an
/// autolink, and `&` only where it starts an entity reference.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;

    for (i, c) in text.char_indices() {
        let next = text[i + c.len_utf8()..].chars().next();
        let escape = match c {
            '\\' | '*' | '`' | '[' | ']' => true,
            '_' => !(prev.is_some_and(char::is_alphanumeric)
                && next.is_some_and(char::is_alphanumeric)),
            '<' => next
                .is_none_or(|n| n.is_ascii_alphanumeric() || matches!(n, '/' | '!' | '?')),
            '&' => ENTITY.is_match(&text[i..]),
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }

    out
}

/// Where compiled inline markdown goes. Pieces passed to `push` may later
/// be broken at their spaces; `push_atomic` pieces never are.
trait Sink {
    fn push(&mut self, text: &str);
    fn push_atomic(&mut self, text: &str);
}

impl Sink for String {
    fn push(&mut self, text: &str) {
        self.push_str(text);
    }

    fn push_atomic(&mut self, text: &str) {
        self.push_str(text);
    }
}

/// Splits compiled output into wrap tokens as it is written.
#[derive(Debug, Default)]
struct Tokens {
    done: Vec<String>,
    current: String,
}

impl Tokens {
    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.done.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.done
    }
}

impl Sink for Tokens {
    fn push(&mut self, text: &str) {
        let mut parts = text.split(' ');
        if let Some(first) = parts.next() {
            self.current.push_str(first);
        }
        for part in parts {
            self.flush();
            self.current.push_str(part);
        }
    }

    fn push_atomic(&mut self, text: &str) {
        self.current.push_str(text);
    }
}

/// Render a run of sibling inline nodes into one string.
///
/// Line breaks inside text become spaces. Plain text is escaped so that
/// parsing the result gives back the same text.
pub fn compile_inline(nodes: &[Node]) -> Result<String> {
    let mut out = String::new();
    compile(nodes, &mut out)?;
    Ok(out)
}

/// Like [`compile_inline`], but split into the tokens a paragraph is
/// wrapped on. Text breaks at single spaces and runs of spaces collapse;
/// a code span is always one token, spaces included.
pub fn inline_tokens(nodes: &[Node]) -> Result<Vec<String>> {
    let mut tokens = Tokens::default();
    compile(nodes, &mut tokens)?;
    Ok(tokens.finish())
}

fn compile<S: Sink>(nodes: &[Node], out: &mut S) -> Result<()> {
    for (index, node) in nodes.iter().enumerate() {
        match &node.kind {
            NodeKind::Text => {
                let mut text = escape_text(&node.literal.replace('\n', " "));
                // `!` directly before a link would turn it into an image
                let before_link = nodes
                    .get(index + 1)
                    .is_some_and(|next| matches!(next.kind, NodeKind::Link { .. }));
                if before_link && text.ends_with('!') {
                    text.insert(text.len() - 1, '\\');
                }
                out.push(&text);
            }
            NodeKind::Emph => out.push(&delimited(&node.children, "*")?),
            NodeKind::Strong => out.push(&delimited(&node.children, "**")?),
            NodeKind::Code => out.push_atomic(&code_span(&node.literal)),
            NodeKind::Link { destination, title } => {
                link(out, &node.children, destination, title)?
            }
            NodeKind::Image { destination, title } => {
                let alt = escape_text(&trim_flatten_spaces(&node.plain_text()));
                out.push("![");
                out.push(&alt);
                out.push("](");
                out.push_atomic(&link_destination(destination));
                push_title(out, title);
                out.push(")");
            }
            other => return Err(RenderError::Unsupported { kind: other.name() }),
        }
    }

    Ok(())
}

/// Emphasis and strong content must be a plain run of text.
fn delimited(children: &[Node], delimiter: &str) -> Result<String> {
    if children.is_empty() || !children.iter().all(Node::is_text) {
        return Err(RenderError::MalformedEmphasis);
    }
    let text: String = children.iter().map(|c| c.literal.as_str()).collect();
    Ok(format!(
        "{delimiter}{}{delimiter}",
        escape_text(&flatten_spaces(&text))
    ))
}

fn link<S: Sink>(out: &mut S, children: &[Node], destination: &str, title: &str) -> Result<()> {
    if children
        .iter()
        .any(|c| matches!(c.kind, NodeKind::Link { .. }))
    {
        return Err(RenderError::NestedLink);
    }
    let words = inline_tokens(children)?;

    if title.is_empty() && words.join(" ") == destination && AUTOLINK.is_match(destination) {
        out.push_atomic(&format!("<{destination}>"));
        return Ok(());
    }

    out.push("[");
    for (index, word) in words.iter().enumerate() {
        if index > 0 {
            out.push(" ");
        }
        out.push_atomic(word);
    }
    out.push("](");
    out.push_atomic(&link_destination(destination));
    push_title(out, title);
    out.push(")");
    Ok(())
}

/// Destinations that are empty or hold spaces, parentheses or angle
/// brackets are written in their `<...>` form.
fn link_destination(destination: &str) -> String {
    let destination = destination.replace('\\', "\\\\");
    if destination.is_empty() || destination.contains([' ', '(', ')', '<', '>']) {
        format!("<{}>", destination.replace('<', "\\<").replace('>', "\\>"))
    } else {
        destination
    }
}

fn push_title<S: Sink>(out: &mut S, title: &str) {
    if !title.is_empty() {
        let title = title.replace('\\', "\\\\").replace('"', "\\\"");
        out.push(&format!(" \"{title}\""));
    }
}

/// Wrap code in a backtick run longer than any run inside it.
///
/// Content that a parser would strip (a leading or trailing backtick, or a
/// space at both ends) gets one padding space on each side.
fn code_span(literal: &str) -> String {
    let content = literal.replace('\n', " ");
    let longest_run = content
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);

    let space_padded = content.starts_with(' ')
        && content.ends_with(' ')
        && content.contains(|c: char| c != ' ');
    if content.starts_with('`') || content.ends_with('`') || space_padded {
        format!("{fence} {content} {fence}")
    } else {
        format!("{fence}{content}{fence}")
    }
}
