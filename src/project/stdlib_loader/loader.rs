//! Loading symbol tables exported by external tooling.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::hir::{MemoryTypeSource, TypeSourceError};

/// Load every `*.json` symbol table directly under `dir` and merge them.
///
/// Files are parsed in parallel and merged in path order, so a class
/// defined twice takes its metadata from the last file. A missing
/// directory yields an empty table; a malformed file is an error.
pub fn load_dir(dir: &Path) -> Result<MemoryTypeSource, TypeSourceError> {
    if !dir.is_dir() {
        warn!("symbol table directory {} not found", dir.display());
        return Ok(MemoryTypeSource::new());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let tables: Vec<MemoryTypeSource> = paths
        .par_iter()
        .map(|path| MemoryTypeSource::load(path))
        .collect::<Result<_, _>>()?;

    let mut merged = MemoryTypeSource::new();
    for table in tables {
        merged.extend(table);
    }
    debug!("loaded {} classes from {}", merged.len(), dir.display());
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::ClassMeta;

    #[test]
    fn test_load_dir_merges_tables() {
        let dir = tempfile::tempdir().unwrap();
        let a = MemoryTypeSource::new().with(ClassMeta::class("p.A"));
        let b = MemoryTypeSource::new().with(ClassMeta::class("q.B"));
        std::fs::write(dir.path().join("a.json"), a.to_json().unwrap()).unwrap();
        std::fs::write(dir.path().join("b.json"), b.to_json().unwrap()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let merged = load_dir(dir.path()).unwrap();
        assert_eq!(merged.len(), 2);
        assert!(merged.get("q.B").is_some());
    }

    #[test]
    fn test_malformed_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{").unwrap();
        assert!(matches!(load_dir(dir.path()), Err(TypeSourceError::Format(_))));
    }
}
