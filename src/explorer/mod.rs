//! Explorer Module
//!
//! Local workspace browsing for the file explorer panel.

pub mod tree;

pub use tree::{build_directory_tree, compare_items, sort_items, FileItem, FileKind};
