//! Directory Tree
//!
//! Builds the file explorer's view of a workspace directory.

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Kind of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
}

/// A file or directory in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    /// Entry name (last path component)
    pub name: String,

    /// Full path, as joined from the requested root
    pub path: String,

    #[serde(rename = "type")]
    pub kind: FileKind,

    /// Sorted children; present only for directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileItem>>,
}

impl FileItem {
    pub fn is_directory(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

/// Directories first, then by name (case-insensitive, ties broken by exact bytes)
pub fn compare_items(a: &FileItem, b: &FileItem) -> Ordering {
    match (a.kind, b.kind) {
        (FileKind::Directory, FileKind::File) => Ordering::Less,
        (FileKind::File, FileKind::Directory) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}

/// Sort one level of items in place
pub fn sort_items(items: &mut [FileItem]) {
    items.sort_by(compare_items);
}

/// Recursively read `root` into a sorted tree
///
/// An unreadable directory is logged and contributes no children. Entries whose
/// metadata cannot be read are skipped. Symlinked directories are listed but not
/// descended into.
pub async fn build_directory_tree(root: impl AsRef<Path>) -> Vec<FileItem> {
    read_level(root.as_ref().to_path_buf()).await
}

fn read_level(dir: PathBuf) -> BoxFuture<'static, Vec<FileItem>> {
    async move {
        let mut items = Vec::new();

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Error reading directory");
                return items;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "Error reading directory entry");
                    break;
                }
            };

            let full_path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            let metadata = match tokio::fs::metadata(&full_path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %full_path.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let path = full_path.to_string_lossy().into_owned();

            if metadata.is_dir() {
                let is_link = entry
                    .file_type()
                    .await
                    .map(|t| t.is_symlink())
                    .unwrap_or(false);
                let children = if is_link {
                    Vec::new()
                } else {
                    read_level(full_path).await
                };

                items.push(FileItem {
                    name,
                    path,
                    kind: FileKind::Directory,
                    children: Some(children),
                });
            } else {
                items.push(FileItem {
                    name,
                    path,
                    kind: FileKind::File,
                    children: None,
                });
            }
        }

        sort_items(&mut items);
        items
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(items: &[FileItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_directories_sort_before_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.rs"), "").unwrap();
        fs::write(dir.path().join("A.md"), "").unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("alpha").join("inner.txt"), "x").unwrap();

        let tree = build_directory_tree(dir.path()).await;

        assert_eq!(names(&tree), vec!["alpha", "zeta", "A.md", "b.rs"]);
        assert!(tree[0].is_directory());
        assert_eq!(names(tree[0].children.as_ref().unwrap()), vec!["inner.txt"]);
        assert_eq!(tree[1].children, Some(Vec::new()));
        assert_eq!(tree[2].children, None);
        assert_eq!(
            tree[0].path,
            dir.path().join("alpha").to_string_lossy().into_owned()
        );
    }

    #[tokio::test]
    async fn test_missing_directory_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tree = build_directory_tree(dir.path().join("nope")).await;
        assert!(tree.is_empty());
    }

    #[test]
    fn test_serializes_with_type_field() {
        let item = FileItem {
            name: "src".to_string(),
            path: "/w/src".to_string(),
            kind: FileKind::Directory,
            children: Some(vec![FileItem {
                name: "lib.rs".to_string(),
                path: "/w/src/lib.rs".to_string(),
                kind: FileKind::File,
                children: None,
            }]),
        };

        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            serde_json::json!({
                "name": "src",
                "path": "/w/src",
                "type": "directory",
                "children": [{"name": "lib.rs", "path": "/w/src/lib.rs", "type": "file"}]
            })
        );
    }

    #[test]
    fn test_name_order_is_case_insensitive() {
        let file = |name: &str| FileItem {
            name: name.to_string(),
            path: name.to_string(),
            kind: FileKind::File,
            children: None,
        };
        let mut items = vec![file("b"), file("B"), file("a")];
        sort_items(&mut items);
        assert_eq!(names(&items), vec!["a", "B", "b"]);
    }
}
