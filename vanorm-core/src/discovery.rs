//! File discovery module for finding video files to process.
//!
//! This module enumerates the files directly under a root directory (or its
//! whole subtree when recursive) and keeps those whose extension is one of
//! the supported video containers, compared case-insensitively.

use crate::error::{CoreError, CoreResult};

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Video container extensions eligible for processing (lower-case).
pub const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "mkv", "avi", "mov", "wmv", "flv"];

/// A discovered video file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VideoFile {
    /// Path as produced by the directory walk
    pub path: PathBuf,
    /// Lower-cased extension, always one of `VIDEO_EXTENSIONS`
    pub extension: String,
}

impl VideoFile {
    /// Creates a `VideoFile` if the path has a supported extension.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let extension = supported_extension(&path)?;
        Some(Self { path, extension })
    }

    /// The file name component as a lossy string.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Returns the lower-cased extension when it is a supported video extension.
fn supported_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Finds video files eligible for processing under `root`.
///
/// Without `recursive`, only the direct children of `root` are considered.
/// With it, the whole subtree is walked. A symbolic link that resolves to a
/// file is returned like a regular file. Linked directories are never
/// descended, so link cycles cannot cause unbounded recursion. Entries that
/// cannot be read are logged and skipped.
///
/// # Errors
///
/// * `CoreError::NotFound` - `root` does not exist or is not a directory
/// * `CoreError::Walkdir` - `root` exists but cannot be listed
///
/// # Examples
///
/// ```rust,no_run
/// use vanorm_core::find_processable_files;
/// use std::path::Path;
///
/// let files = find_processable_files(Path::new("/path/to/videos"), true).unwrap();
/// for file in files {
///     println!("{}", file.path.display());
/// }
/// ```
pub fn find_processable_files(root: &Path, recursive: bool) -> CoreResult<Vec<VideoFile>> {
    if !root.is_dir() {
        return Err(CoreError::NotFound(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .follow_links(false)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // The root itself could not be listed.
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        // Links to files are kept; linked directories are never descended.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        if let Some(file) = VideoFile::from_path(entry.into_path()) {
            files.push(file);
        }
    }

    log::debug!(
        "Discovered {} video file(s) under {} (recursive: {})",
        files.len(),
        root.display(),
        recursive
    );
    Ok(files)
}

/// Drops files whose name already starts with the output prefix.
#[must_use]
pub fn exclude_prefixed(files: Vec<VideoFile>, prefix: &str) -> Vec<VideoFile> {
    files
        .into_iter()
        .filter(|file| !file.file_name().starts_with(prefix))
        .collect()
}
