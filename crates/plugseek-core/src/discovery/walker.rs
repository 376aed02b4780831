//! Filesystem enumeration used by discovery.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// What a visitor wants the walker to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    Continue,
    /// Stop walking the current search root.
    Stop,
}

/// Enumerates regular files below a search root.
///
/// Entries that cannot be read are skipped by the walker and never reach
/// the visitor.
pub trait FileWalker {
    /// Call `visit` for every regular file under `root`, in a stable order.
    /// Without `recursive` only the direct children of `root` are visited.
    fn walk(&self, root: &Path, recursive: bool, visit: &mut dyn FnMut(&Path) -> WalkAction);

    /// Canonical absolute form of `path`, or `None` if it cannot be resolved.
    fn canonicalize(&self, path: &Path) -> Option<PathBuf>;
}

/// [`FileWalker`] over the real filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsWalker {
    follow_symlinks: bool,
}

impl FsWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links to directories.
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

impl FileWalker for FsWalker {
    fn walk(&self, root: &Path, recursive: bool, visit: &mut dyn FnMut(&Path) -> WalkAction) {
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }

        let entries = walker.into_iter().filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(root = %root.display(), error = %e, "Skipping unreadable entry");
                None
            }
        });

        for entry in entries.filter(is_file_or_file_link) {
            if visit(entry.path()) == WalkAction::Stop {
                break;
            }
        }
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path)
            .map_err(|e| {
                tracing::debug!(path = %path.display(), error = %e, "Cannot canonicalize path");
            })
            .ok()
    }
}

/// Regular files, and symlinks that resolve to one. Links to directories
/// are only descended into when following is enabled.
fn is_file_or_file_link(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
