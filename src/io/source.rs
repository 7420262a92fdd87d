//! Source workbook resolution.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::LoadError;

/// Pick the first existing file among the primary and fallback paths.
pub fn resolve_source(primary: &Path, fallback: Option<&Path>) -> Result<PathBuf, LoadError> {
    let mut tried = Vec::new();
    for candidate in std::iter::once(primary).chain(fallback) {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "resolved source workbook");
            return Ok(candidate.to_path_buf());
        }
        tried.push(candidate.to_path_buf());
    }
    Err(LoadError::SourceNotFound { tried })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn prefers_primary_when_both_exist() {
        let dir = TempDir::new().unwrap();
        let primary = dir.path().join("dados.xlsx");
        let fallback = dir.path().join("fallback.xlsx");
        fs::write(&primary, b"x").unwrap();
        fs::write(&fallback, b"x").unwrap();

        assert_eq!(resolve_source(&primary, Some(&fallback)).unwrap(), primary);
    }

    #[test]
    fn falls_back_when_primary_missing() {
        let dir = TempDir::new().unwrap();
        let primary = dir.path().join("dados.xlsx");
        let fallback = dir.path().join("fallback.xlsx");
        fs::write(&fallback, b"x").unwrap();

        assert_eq!(resolve_source(&primary, Some(&fallback)).unwrap(), fallback);
    }

    #[test]
    fn directories_do_not_count_as_sources() {
        let dir = TempDir::new().unwrap();
        let err = resolve_source(dir.path(), None).unwrap_err();
        assert_eq!(
            err,
            LoadError::SourceNotFound {
                tried: vec![dir.path().to_path_buf()]
            }
        );
    }

    #[test]
    fn reports_every_path_tried() {
        let dir = TempDir::new().unwrap();
        let primary = dir.path().join("a.xlsx");
        let fallback = dir.path().join("b.xlsx");

        match resolve_source(&primary, Some(&fallback)) {
            Err(LoadError::SourceNotFound { tried }) => assert_eq!(tried, vec![primary, fallback]),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
