//! Block-level rendering: the tree walker that drives the wrapper and the
//! table formatter.

use super::error::{RenderError, Result};
use super::inline::{escape_text, inline_tokens, trim_flatten_spaces};
use super::table::render_table;
use super::wrap::Wrapper;
use crate::models::{Node, NodeKind};

/// Render one top-level block into `out`, followed by a blank line.
pub(crate) fn render_block(out: &mut String, cols: usize, node: &Node) -> Result<()> {
    match &node.kind {
        NodeKind::Heading { level } => heading(out, *level, node),
        NodeKind::Paragraph => {
            let mut w = Wrapper::new(out, cols);
            paragraph(&mut w, node)?;
            w.newline();
            Ok(())
        }
        NodeKind::CodeBlock {
            fenced,
            fence_length,
            info,
        } => {
            code_block(out, *fenced, *fence_length, info, &node.literal);
            Ok(())
        }
        NodeKind::BlockQuote => {
            let mut w = Wrapper::new(out, cols);
            block_quote(&mut w, node)?;
            out.push('\n');
            Ok(())
        }
        NodeKind::List { ordered } => {
            let mut w = Wrapper::new(out, cols);
            list(&mut w, *ordered, node)?;
            w.newline();
            Ok(())
        }
        NodeKind::Table { .. } => {
            out.push_str(&render_table(node)?);
            Ok(())
        }
        other => Err(RenderError::Unsupported { kind: other.name() }),
    }
}

/// Headings are line based and never wrapped.
fn heading(out: &mut String, level: u8, node: &Node) -> Result<()> {
    let mut text = String::new();
    for child in &node.children {
        if !child.is_text() {
            return Err(RenderError::HeadingContent {
                found: child.kind.name(),
            });
        }
        text.push_str(&child.literal);
    }

    let mut text = escape_text(&trim_flatten_spaces(&text));
    // a trailing run of `#` would be read as a closing sequence
    let last_word = text.rfind(' ').map_or(0, |i| i + 1);
    if last_word < text.len() && text[last_word..].chars().all(|c| c == '#') {
        text.insert(last_word, '\\');
    }

    out.extend(std::iter::repeat_n('#', usize::from(level)));
    if !text.is_empty() {
        out.push(' ');
        out.push_str(&text);
    }
    out.push_str("\n\n");
    Ok(())
}

/// Paragraphs take a wrapper so quotes and list items can supply prefixes.
fn paragraph(w: &mut Wrapper<'_>, node: &Node) -> Result<()> {
    let tokens = inline_tokens(&node.children)?;
    w.write_tokens(tokens.iter().map(String::as_str));
    w.terminate_line();
    Ok(())
}

fn code_block(out: &mut String, fenced: bool, fence_length: usize, info: &str, code: &str) {
    let fence_length = if fenced && fence_length > 0 {
        fence_length
    } else {
        3
    };
    let fence = "`".repeat(fence_length);

    out.push_str(&fence);
    out.push_str(info);
    out.push('\n');
    out.push_str(code);
    out.push_str(&fence);
    out.push_str("\n\n");
}

fn block_quote(w: &mut Wrapper<'_>, node: &Node) -> Result<()> {
    let mut quote = w.embed("> ", "> ");
    if node.children.is_empty() {
        quote.newline();
        return Ok(());
    }

    for (index, child) in node.children.iter().enumerate() {
        if index > 0 {
            quote.newline();
        }
        match child.kind {
            NodeKind::Paragraph => paragraph(&mut quote, child)?,
            NodeKind::BlockQuote => block_quote(&mut quote, child)?,
            ref other => {
                return Err(RenderError::BlockQuoteContent {
                    found: other.name(),
                });
            }
        }
        quote.terminate_line();
    }

    Ok(())
}

fn list(w: &mut Wrapper<'_>, ordered: bool, node: &Node) -> Result<()> {
    for (index, item) in node.children.iter().enumerate() {
        if item.kind != NodeKind::Item {
            return Err(RenderError::ListChild {
                found: item.kind.name(),
            });
        }

        let marker = if ordered {
            format!("{}. ", index + 1)
        } else {
            "- ".to_string()
        };
        let indent = " ".repeat(marker.len().max(3));

        let (first, rest) = match item.children.split_first() {
            Some((first, rest)) if first.kind == NodeKind::Paragraph => (first, rest),
            Some((first, _)) => {
                return Err(RenderError::ListItemShape {
                    found: first.kind.name(),
                });
            }
            None => return Err(RenderError::ListItemShape { found: "empty item" }),
        };
        paragraph(&mut w.embed(&marker, &indent), first)?;

        match rest {
            [] => {}
            [nested] => match nested.kind {
                NodeKind::List { ordered } => {
                    list(&mut w.embed(&indent, &indent), ordered, nested)?
                }
                ref other => {
                    return Err(RenderError::ListItemShape {
                        found: other.name(),
                    });
                }
            },
            [extra, ..] => {
                return Err(RenderError::ListItemShape {
                    found: extra.kind.name(),
                });
            }
        }
    }

    Ok(())
}
