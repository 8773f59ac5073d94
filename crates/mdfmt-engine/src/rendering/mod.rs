//! Canonical markdown rendering.
//!
//! A [`Renderer`] walks a parsed [`Node`] tree and writes each top-level block
//! back out in one fixed style: paragraphs wrapped to a column budget, `>`
//! quotes, `-` and `1.` lists, backtick fences and padded tables.

mod block;
pub mod error;
pub mod inline;
pub mod table;
pub mod wrap;

pub use error::{ErrorKind, RenderError, Result};
pub use wrap::Wrapper;

use crate::models::{Node, NodeKind};
use crate::parsing::parse_markdown;

/// Column budget used when nothing else is configured.
pub const DEFAULT_COLS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Target line width for wrapped paragraphs, quotes and list items.
    pub cols: usize,
}

impl Options {
    /// Options with the given column budget; zero is raised to one.
    pub fn with_cols(cols: usize) -> Self {
        Self { cols: cols.max(1) }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self { cols: DEFAULT_COLS }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: Options,
}

impl Renderer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Render a tree. A document root renders each of its children as a
    /// block; any other node is rendered as a single block.
    pub fn render(&self, root: &Node) -> Result<String> {
        let mut out = String::new();
        let cols = self.options.cols;

        if root.kind == NodeKind::Document {
            for child in &root.children {
                block::render_block(&mut out, cols, child)?;
            }
        } else {
            block::render_block(&mut out, cols, root)?;
        }

        Ok(finish(out))
    }

    /// Parse and render markdown text.
    pub fn render_str(&self, source: &str) -> Result<String> {
        self.render(&parse_markdown(source))
    }

    /// Parse and render raw input bytes, which must be UTF-8.
    pub fn render_bytes(&self, source: &[u8]) -> Result<Vec<u8>> {
        let source = std::str::from_utf8(source)?;
        Ok(self.render_str(source)?.into_bytes())
    }
}

/// Convenience wrapper around [`Renderer::render_str`].
pub fn render_markdown(source: &str, options: Options) -> Result<String> {
    Renderer::new(options).render_str(source)
}

/// Every block ends with a blank line; the document ends with exactly one
/// newline, and an empty document renders as nothing.
fn finish(mut out: String) -> String {
    if out.ends_with("\n\n") {
        out.pop();
    }
    if out.len() == 1 && out.trim().is_empty() {
        out.clear();
    }
    out
}
