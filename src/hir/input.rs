//! The set of source files a project resolves over.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::base::FileId;

/// Paths of every compilation unit in the project, in insertion order.
///
/// File ids are handed out here; a path keeps its id across updates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceRoot {
    files: IndexMap<FileId, Arc<str>>,
    next: u32,
}

impl SourceRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `path`, allocating one for a path not seen before.
    pub fn file_for(&mut self, path: &str) -> FileId {
        if let Some(file) = self.lookup(path) {
            return file;
        }
        let file = FileId::new(self.next);
        self.next += 1;
        self.files.insert(file, Arc::from(path));
        file
    }

    pub fn lookup(&self, path: &str) -> Option<FileId> {
        self.files
            .iter()
            .find(|(_, p)| p.as_ref() == path)
            .map(|(&id, _)| id)
    }

    pub fn remove(&mut self, file: FileId) -> Option<Arc<str>> {
        self.files.shift_remove(&file)
    }

    pub fn path(&self, file: FileId) -> Option<&str> {
        self.files.get(&file).map(|s| s.as_ref())
    }

    pub fn contains(&self, file: FileId) -> bool {
        self.files.contains_key(&file)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &str)> + '_ {
        self.files.iter().map(|(&id, path)| (id, path.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_keep_their_ids() {
        let mut root = SourceRoot::new();
        let a = root.file_for("src/p/A.java");
        let b = root.file_for("src/p/B.java");
        assert_ne!(a, b);
        assert_eq!(root.file_for("src/p/A.java"), a);
        assert_eq!(root.len(), 2);
        assert_eq!(root.path(b), Some("src/p/B.java"));
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut root = SourceRoot::new();
        let a = root.file_for("A.java");
        root.remove(a);
        assert!(!root.contains(a));
        let again = root.file_for("A.java");
        assert_ne!(again, a);
    }
}
