use crate::app::hasher::normalize;
use crate::app::models::{FilterSet, NO_EXTENSION};
use std::path::{Path, PathBuf};

/// Decides per-entry inclusion for a [`FilterSet`].
///
/// Rules, first match wins:
/// 1. a basename starting with `.` is excluded, files and directories alike;
/// 2. a file whose extension is not in a non-empty extension set is excluded;
/// 3. an entry whose basename, or base-relative path, equals an ignore entry is excluded.
#[derive(Debug, Clone)]
pub struct PathFilter {
    filters: FilterSet,
    base: PathBuf,
}

impl PathFilter {
    pub fn new(filters: FilterSet, base: impl Into<PathBuf>) -> Self {
        Self {
            filters,
            base: base.into(),
        }
    }

    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };
        if name.is_empty() {
            return false;
        }

        if name.starts_with('.') {
            return true;
        }

        if !is_dir && !self.filters.extensions.is_empty() {
            let ext = extension_of(path);
            if !self.filters.extensions.contains(&ext) {
                return true;
            }
        }

        if self.filters.ignores.is_empty() {
            return false;
        }
        if self.filters.ignores.iter().any(|i| *i == name) {
            return true;
        }
        let relative = normalize(path, &self.base);
        self.filters.ignores.iter().any(|i| *i == relative)
    }
}

/// Extension including the leading dot, or [`NO_EXTENSION`].
pub fn extension_of(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => NO_EXTENSION.to_string(),
    }
}
