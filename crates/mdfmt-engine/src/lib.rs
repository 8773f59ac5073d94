pub mod io;
pub mod models;
pub mod parsing;
pub mod rendering;


// Re-export key types for easier usage
pub use io::*;
pub use models::{Alignment, Node, NodeKind};
pub use parsing::{parse_bytes, parse_markdown};
pub use rendering::{DEFAULT_COLS, ErrorKind, Options, RenderError, Renderer, render_markdown};
