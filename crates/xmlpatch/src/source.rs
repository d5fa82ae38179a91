//! Enumerate markup files under a directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};

/// A markup file read into memory
#[derive(Debug)]
pub struct SourceDocument {
    /// Path relative to the scanned root, `/`-separated
    pub label: String,
    /// Full path of the file that was read
    pub path: PathBuf,
    /// First-level subdirectory the file sits in; `None` for files directly
    /// in the root
    pub category: Option<String>,
    /// Raw file bytes, or the error hit while reading this one file.
    /// Decoding happens when the document is parsed.
    pub contents: io::Result<Vec<u8>>,
}

impl SourceDocument {
    pub fn new(label: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        let label = label.into();
        Self {
            path: PathBuf::from(&label),
            label,
            category: None,
            contents: Ok(contents.into()),
        }
    }

    /// Contents as text, if they were read and are valid UTF-8
    pub fn text(&self) -> Option<&str> {
        let bytes = self.contents.as_deref().ok()?;
        std::str::from_utf8(bytes).ok()
    }
}

/// Options for directory enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumerateOptions {
    /// Subdirectory levels to descend into (0 = root only)
    pub max_depth: usize,
    /// File extension to collect, compared case-insensitively
    pub extension: String,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            extension: "xml".to_string(),
        }
    }
}

impl EnumerateOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// Read every matching file under `root`, sorted by name at each level.
///
/// A file that can't be read is still returned, with the error in
/// [`SourceDocument::contents`]. Only a directory that can't be listed
/// fails the whole call.
#[instrument(skip(options), fields(max_depth = options.max_depth))]
pub fn collect_sources(root: &Path, options: &EnumerateOptions) -> Result<Vec<SourceDocument>> {
    let mut sources = Vec::new();
    walk(root, root, 0, options, &mut sources)?;
    info!(count = sources.len(), "collected source documents");
    Ok(sources)
}

/// Read a single file as a source document labelled by its file name.
///
/// Unlike [`collect_sources`], a file that can't be read is an error here.
pub fn read_source(path: &Path) -> Result<SourceDocument> {
    info!("Reading file: {}", path.display());
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SourceDocument {
        label,
        path: path.to_path_buf(),
        category: None,
        contents: Ok(bytes),
    })
}

fn walk(
    root: &Path,
    dir: &Path,
    depth: usize,
    options: &EnumerateOptions,
    sources: &mut Vec<SourceDocument>,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(dir, e))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if depth >= options.max_depth {
                debug!("Skipping directory beyond depth limit: {}", path.display());
                continue;
            }
            info!("Reading directory: {}", path.display());
            walk(root, &path, depth + 1, options, sources)?;
        } else if options.matches(&path) {
            info!("Reading file: {}", path.display());
            let contents = fs::read(&path);
            if let Err(err) = &contents {
                warn!("Could not read {}: {err}", path.display());
            }
            let relative = path.strip_prefix(root).unwrap_or(&path);
            sources.push(SourceDocument {
                label: label_for(relative),
                category: category_for(relative),
                path,
                contents,
            });
        } else {
            debug!("Skipping non-matching file: {}", path.display());
        }
    }
    Ok(())
}

fn label_for(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn category_for(relative: &Path) -> Option<String> {
    let mut components = relative.components();
    let first = components.next()?;
    // a file directly in the root has only one component
    components.next()?;
    Some(first.as_os_str().to_string_lossy().into_owned())
}
