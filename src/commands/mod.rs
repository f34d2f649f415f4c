// Commands module - handles CLI command execution

use std::path::{Path, PathBuf};

pub mod check;
pub mod inspect;
pub mod tree;

pub use check::handle_check;
pub use inspect::handle_inspect;
pub use tree::handle_tree;

/// Collect all .txt save files from a path
pub fn collect_save_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        if path.extension().is_some_and(|e| e == "txt") {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        let walker = walkdir::WalkDir::new(path).into_iter().filter_entry(|e| {
            // Always include the root directory itself, even if it starts with '.'
            if e.depth() == 0 {
                return true;
            }
            !e.file_name().to_string_lossy().starts_with('.')
        });

        for entry in walker.flatten() {
            if entry.file_type().is_file() {
                if let Some(ext) = entry.path().extension() {
                    if ext == "txt" {
                        files.push(entry.path().to_path_buf());
                    }
                }
            }
        }
    }

    files
}
