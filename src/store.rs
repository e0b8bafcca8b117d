//! Knowledge-base loading.
//!
//! Walks a directory tree for `.txt` documents, splits each into
//! overlapping chunks, and holds the result as a read-only collection
//! for the lifetime of the process.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::chunk::split_text;

/// A retrievable slice of a source document.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Chunk text, at most `chunk_size` characters.
    pub content: String,
    /// File name of the originating document. Provenance only; never
    /// used for ranking.
    pub source: String,
}

/// Immutable, in-memory collection of document chunks.
///
/// Built once at startup and frozen afterward; safe to share across
/// sessions behind an `Arc` since it only exposes `&self` accessors.
pub struct DocumentStore {
    chunks: Vec<Chunk>,
}

impl DocumentStore {
    /// Load every `.txt` file under `root` (recursively) into chunks.
    ///
    /// A missing root is not an error: the directory is created and an
    /// empty store is returned, since an empty knowledge base is a
    /// valid state. Unreadable or non-UTF-8 files are logged and
    /// skipped without aborting the rest of the load.
    pub fn load(root: &Path, chunk_size: usize, overlap: usize) -> Result<Self> {
        if !root.exists() {
            std::fs::create_dir_all(root)?;
            debug!(root = %root.display(), "knowledge root created, starting empty");
            return Ok(Self { chunks: Vec::new() });
        }

        let mut paths: Vec<_> = WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("txt"))
            .collect();

        // Sort for deterministic chunk order (and therefore stable
        // tie-breaking in ranked search).
        paths.sort();

        let mut chunks = Vec::new();

        for path in &paths {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable document");
                    continue;
                }
            };

            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }

            let source = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            for content in split_text(trimmed, chunk_size, overlap) {
                chunks.push(Chunk {
                    content,
                    source: source.clone(),
                });
            }
        }

        debug!(documents = paths.len(), chunks = chunks.len(), "knowledge base loaded");

        Ok(Self { chunks })
    }

    /// Build a store directly from chunks. Test seam.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
