use crate::rendering::{RenderError, Renderer};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A file together with its canonical rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedFile {
    pub path: PathBuf,
    pub original: Vec<u8>,
    pub rendered: String,
}

impl FormattedFile {
    /// Whether the canonical form differs from what is on disk.
    pub fn changed(&self) -> bool {
        self.original != self.rendered.as_bytes()
    }
}

/// Read the raw bytes of a markdown file
pub fn read_file(path: &Path) -> Result<Vec<u8>, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read(path).map_err(IoError::Io)
}

/// Load a markdown file and render it to canonical form
pub fn render_file(path: &Path, renderer: &Renderer) -> Result<String, IoError> {
    Ok(format_file(path, renderer)?.rendered)
}

/// Load a markdown file, keeping both the original bytes and the rendering
pub fn format_file(path: &Path, renderer: &Renderer) -> Result<FormattedFile, IoError> {
    log::debug!("rendering {}", path.display());
    let original = read_file(path)?;
    let source = std::str::from_utf8(&original).map_err(RenderError::from)?;
    let rendered = renderer.render_str(source)?;

    Ok(FormattedFile {
        path: path.to_path_buf(),
        original,
        rendered,
    })
}

/// Write content to a markdown file
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

pub fn is_markdown_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Recursively collect markdown files under `root`, sorted by path
pub fn scan_markdown_files(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !root.exists() {
        return Err(IoError::NotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();
    log::debug!("found {} markdown files under {}", files.len(), root.display());
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if is_markdown_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}
