//! Memoized workbook loads.
//!
//! Interactive use re-scores on every slider move; parsing the workbook each
//! time would be wasted I/O. `QuoteCache` keeps one loaded book per source
//! file.
//!
//! Invalidation rule: an entry is reused only while the file's modification
//! time and the `SourceSpec` it was loaded with are unchanged. When the
//! platform cannot report a modification time, every request reloads.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use tracing::debug;

use crate::domain::SourceSpec;
use crate::error::LoadError;
use crate::io::ingest::{LoadedBook, load_book};
use crate::io::source::resolve_source;

struct CacheEntry {
    modified: Option<SystemTime>,
    spec: SourceSpec,
    book: Rc<LoadedBook>,
}

/// Explicit load cache, owned by whoever drives the pipeline.
#[derive(Default)]
pub struct QuoteCache {
    entries: HashMap<PathBuf, CacheEntry>,
    loads: usize,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the source path and return its loaded book, parsing only when needed.
    pub fn get_or_load(&mut self, spec: &SourceSpec) -> Result<Rc<LoadedBook>, LoadError> {
        let path = resolve_source(&spec.primary_path, spec.fallback_path.as_deref())?;
        self.get_or_load_with(&path, spec, load_book)
    }

    /// Same as `get_or_load`, for an already-resolved path and a custom loader.
    pub fn get_or_load_with<F>(
        &mut self,
        path: &Path,
        spec: &SourceSpec,
        loader: F,
    ) -> Result<Rc<LoadedBook>, LoadError>
    where
        F: FnOnce(&Path, &SourceSpec) -> Result<LoadedBook, LoadError>,
    {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let modified = modified_time(path);

        if let Some(entry) = self.entries.get(&key) {
            if modified.is_some() && entry.modified == modified && entry.spec == *spec {
                debug!(path = %key.display(), "workbook cache hit");
                return Ok(Rc::clone(&entry.book));
            }
            debug!(path = %key.display(), "workbook changed; reloading");
        }

        let book = Rc::new(loader(path, spec)?);
        self.loads += 1;
        self.entries.insert(
            key,
            CacheEntry {
                modified,
                spec: spec.clone(),
                book: Rc::clone(&book),
            },
        );
        Ok(book)
    }

    /// Drop the entry for `path`, forcing the next request to reload.
    pub fn invalidate(&mut self, path: &Path) {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key);
    }

    /// Number of loads performed (cache misses) so far.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
