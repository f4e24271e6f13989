//! Logical config path handling.
use std::path::{Component, Path, PathBuf};

use crate::storage::config::ConfigFormat;
use crate::storage::error::StorageSystemError;

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Remove a trailing filename extension.
///
/// Only strips when the path has a separator and the last `.` comes after
/// it, so dotted directory names survive and a bare `name.ext` without any
/// separator is returned unchanged.
pub fn strip_extension(path: &str) -> &str {
    match (path.rfind('.'), path.rfind(is_separator)) {
        (Some(dot), Some(sep)) if dot > sep => &path[..dot],
        _ => path,
    }
}

/// Reject logical paths that would escape their root.
pub fn validate_relative(path: &str) -> Result<(), StorageSystemError> {
    let invalid = |reason: &str| StorageSystemError::InvalidPath {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    };
    if path.trim().is_empty() {
        return Err(invalid("path is empty"));
    }
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("parent directory segments are not allowed")),
            Component::RootDir | Component::Prefix(_) => return Err(invalid("path must be relative")),
        }
    }
    Ok(())
}

/// Design-time location of a logical path: the path itself when it already
/// names a known format, otherwise the path with `default`'s suffix.
pub fn design_time_path(path: &str, default: ConfigFormat) -> PathBuf {
    let logical = PathBuf::from(path);
    if ConfigFormat::from_path(&logical).is_some() {
        logical
    } else {
        PathBuf::from(format!("{}.{}", path, default.extension()))
    }
}

/// Every file a live bundled load may read for `path`, in probe order.
///
/// A path that already names a known format is tried as-is first; then the
/// stripped path is tried with each supported suffix.
pub fn bundled_candidates(path: &str) -> Vec<(PathBuf, ConfigFormat)> {
    let mut candidates = Vec::new();
    let raw = PathBuf::from(path);
    if let Some(format) = ConfigFormat::from_path(&raw) {
        candidates.push((raw, format));
    }
    let stem = strip_extension(path);
    for format in ConfigFormat::all() {
        let candidate = PathBuf::from(format!("{}.{}", stem, format.extension()));
        if !candidates.iter().any(|(existing, _)| *existing == candidate) {
            candidates.push((candidate, *format));
        }
    }
    candidates
}
