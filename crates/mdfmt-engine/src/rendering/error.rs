use std::str::Utf8Error;

/// Broad classes of rendering failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A node's children violate the shape its kind requires
    Structural,
    /// A construct the renderer does not implement
    Unsupported,
    /// Header and body rows of a table disagree, or the table is empty
    TableShape,
    /// The input could not be handed to the parser
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("headings may only contain text elements, found {found}")]
    HeadingContent { found: &'static str },
    #[error("block quotes may only contain paragraphs or block quotes, found {found}")]
    BlockQuoteContent { found: &'static str },
    #[error("all list children must be list items, found {found}")]
    ListChild { found: &'static str },
    #[error("list items must hold a paragraph optionally followed by a list, found {found}")]
    ListItemShape { found: &'static str },
    #[error("invalid italic or bold formatting")]
    MalformedEmphasis,
    #[error("links may not be nested inside links")]
    NestedLink,
    #[error("unsupported node kind: {kind}")]
    Unsupported { kind: &'static str },
    #[error("invalid table structure: {reason}")]
    InvalidTable { reason: &'static str },
    #[error("table row {row} too short: expected {expected} cells, found {found}")]
    RowTooShort {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("table row {row} too long: expected {expected} cells, found {found}")]
    RowTooLong {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::HeadingContent { .. }
            | RenderError::BlockQuoteContent { .. }
            | RenderError::ListChild { .. }
            | RenderError::ListItemShape { .. }
            | RenderError::MalformedEmphasis
            | RenderError::NestedLink => ErrorKind::Structural,
            RenderError::Unsupported { .. } => ErrorKind::Unsupported,
            RenderError::InvalidTable { .. }
            | RenderError::RowTooShort { .. }
            | RenderError::RowTooLong { .. } => ErrorKind::TableShape,
            RenderError::InvalidUtf8(_) => ErrorKind::Input,
        }
    }
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
