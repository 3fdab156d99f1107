//! Low-level backend: direct `read_dir` recursion over one reused path buffer,
//! with extensions matched as fixed-width byte suffixes.
//!
//! Filters are compiled into bounded tables before each scan. Anything that
//! does not fit is reported as a [`CapacityError`] so the digest never drifts
//! from the portable backend.

use super::suffix::{load_tail, SuffixPattern};
use crate::app::error::{CapacityError, ScanError};
use crate::app::hasher::{hash_normalized, normalize};
use crate::app::models::{Digest, FilterSet, ScanRequest, NO_EXTENSION};
use crate::app::scanner::{ScanOptions, TreeScanner};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerLimits {
    pub max_ext_filters: usize,
    pub max_ignore_filters: usize,
    pub max_ignore_len: usize,
    pub max_path_len: usize,
}

impl Default for ScannerLimits {
    fn default() -> Self {
        Self {
            max_ext_filters: 64,
            max_ignore_filters: 64,
            max_ignore_len: 255,
            max_path_len: 4096,
        }
    }
}

#[derive(Debug, Default)]
struct CompiledFilters {
    /// The extension set was non-empty, even if no pattern can match.
    ext_active: bool,
    no_ext: bool,
    patterns: Vec<SuffixPattern>,
    ignores: Vec<Vec<u8>>,
}

impl CompiledFilters {
    fn compile(filters: &FilterSet, limits: &ScannerLimits) -> Result<Self, CapacityError> {
        if filters.extensions.len() > limits.max_ext_filters {
            return Err(CapacityError::TooManyExtensions {
                count: filters.extensions.len(),
                limit: limits.max_ext_filters,
            });
        }
        if filters.ignores.len() > limits.max_ignore_filters {
            return Err(CapacityError::TooManyIgnores {
                count: filters.ignores.len(),
                limit: limits.max_ignore_filters,
            });
        }

        let mut compiled = Self {
            ext_active: !filters.extensions.is_empty(),
            ..Self::default()
        };
        for ext in &filters.extensions {
            if ext == NO_EXTENSION {
                compiled.no_ext = true;
                continue;
            }
            let pattern = SuffixPattern::new(ext.as_bytes())?;
            // A real extension is one dot followed by dot-free bytes; anything
            // else can never equal one, and as a raw suffix it would over-match.
            let bytes = ext.as_bytes();
            if bytes[0] != b'.' || bytes[1..].iter().any(|&b| b == b'.' || b == 0) {
                continue;
            }
            compiled.patterns.push(pattern);
        }

        for ignore in &filters.ignores {
            if ignore.len() > limits.max_ignore_len {
                return Err(CapacityError::IgnoreTooLong {
                    pattern: ignore.clone(),
                    limit: limits.max_ignore_len,
                });
            }
            compiled.ignores.push(ignore.as_bytes().to_vec());
        }
        Ok(compiled)
    }

    fn extension_rejects(&self, name: &[u8]) -> bool {
        if !self.ext_active {
            return false;
        }
        if self.no_ext && !name.contains(&b'.') {
            return false;
        }
        let tail = load_tail(name);
        !self.patterns.iter().any(|p| p.matches(&tail))
    }

    fn is_ignored(&self, name: &[u8], relative: &[u8]) -> bool {
        self.ignores
            .iter()
            .any(|i| i.as_slice() == name || i.as_slice() == relative)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    LinkedDir,
    File,
    Other,
}

pub struct AcceleratedScanner {
    options: ScanOptions,
    limits: ScannerLimits,
    relative: Vec<u8>,
    ancestors: Vec<PathBuf>,
}

impl AcceleratedScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self::with_limits(options, ScannerLimits::default())
    }

    pub fn with_limits(options: ScanOptions, limits: ScannerLimits) -> Self {
        Self {
            options,
            limits,
            relative: Vec::with_capacity(limits.max_path_len),
            ancestors: Vec::new(),
        }
    }

    fn classify(&self, entry: &fs::DirEntry) -> EntryKind {
        let Ok(file_type) = entry.file_type() else {
            return EntryKind::Other;
        };
        if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => EntryKind::File,
                Ok(meta) if meta.is_dir() && self.options.follow_symlinks => EntryKind::LinkedDir,
                _ => EntryKind::Other,
            }
        } else {
            EntryKind::Other
        }
    }

    fn push_component(&mut self, name: &[u8]) -> Result<(), CapacityError> {
        if !self.relative.is_empty() && self.relative.last() != Some(&b'/') {
            self.relative.push(b'/');
        }
        self.relative.extend_from_slice(name);
        if self.relative.len() > self.limits.max_path_len {
            return Err(CapacityError::PathTooLong {
                path: String::from_utf8_lossy(&self.relative).into_owned(),
                limit: self.limits.max_path_len,
            });
        }
        Ok(())
    }

    /// Relative path of `name` under the current directory, for log output only.
    fn child_display(&self, name: &[u8]) -> String {
        let mut display = String::from_utf8_lossy(&self.relative).into_owned();
        if !display.is_empty() && !display.ends_with('/') {
            display.push('/');
        }
        display.push_str(&String::from_utf8_lossy(name));
        display
    }

    fn scan_dir(
        &mut self,
        dir: &Path,
        filters: &CompiledFilters,
        recursive: bool,
    ) -> Result<Digest, ScanError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Cannot read directory {}: {}", dir.display(), err);
                return Ok(0);
            }
        };

        let mut hash: Digest = 0;
        for entry in entries {
            self.options.cancel.check()?;
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Error walking entry: {}", err);
                    continue;
                }
            };

            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            let name = name.as_bytes();
            if name.is_empty() {
                continue;
            }
            if name[0] == b'.' {
                if log::log_enabled!(log::Level::Debug)
                    && !matches!(self.classify(&entry), EntryKind::Dir | EntryKind::LinkedDir)
                {
                    log::debug!("   {}", self.child_display(name));
                }
                continue;
            }

            let kind = self.classify(&entry);
            let descend = matches!(kind, EntryKind::Dir | EntryKind::LinkedDir) && recursive;
            if !descend && kind != EntryKind::File {
                continue;
            }

            let mark = self.relative.len();
            self.push_component(name)?;

            if descend {
                if !filters.is_ignored(name, &self.relative) {
                    hash ^= self.descend(&entry.path(), kind, filters)?;
                }
            } else if filters.extension_rejects(name) || filters.is_ignored(name, &self.relative) {
                log::debug!("   {}", String::from_utf8_lossy(&self.relative));
            } else {
                log::debug!(" * {}", String::from_utf8_lossy(&self.relative));
                hash ^= hash_normalized(&self.relative);
            }

            self.relative.truncate(mark);
        }
        Ok(hash)
    }

    fn descend(
        &mut self,
        path: &Path,
        kind: EntryKind,
        filters: &CompiledFilters,
    ) -> Result<Digest, ScanError> {
        let real = if kind == EntryKind::LinkedDir {
            match fs::canonicalize(path) {
                Ok(real) => real,
                Err(err) => {
                    log::warn!("Cannot resolve link {}: {}", path.display(), err);
                    return Ok(0);
                }
            }
        } else {
            match (self.ancestors.last(), path.file_name()) {
                (Some(parent), Some(name)) => parent.join(name),
                _ => path.to_path_buf(),
            }
        };

        if kind == EntryKind::LinkedDir && self.ancestors.contains(&real) {
            log::warn!(
                "File system loop found: {} points to an ancestor {}",
                path.display(),
                real.display()
            );
            return Ok(0);
        }

        self.ancestors.push(real);
        let result = self.scan_dir(path, filters, true);
        self.ancestors.pop();
        result
    }
}

impl TreeScanner for AcceleratedScanner {
    fn name(&self) -> &'static str {
        "accelerated"
    }

    fn scan(&mut self, filters: &FilterSet, request: &ScanRequest) -> Result<Digest, ScanError> {
        let compiled = CompiledFilters::compile(filters, &self.limits)?;

        self.relative.clear();
        self.relative
            .extend_from_slice(normalize(&request.root, self.options.base()).as_bytes());
        if self.relative.len() > self.limits.max_path_len {
            return Err(CapacityError::PathTooLong {
                path: String::from_utf8_lossy(&self.relative).into_owned(),
                limit: self.limits.max_path_len,
            }
            .into());
        }

        self.ancestors.clear();
        if self.options.follow_symlinks {
            let root = fs::canonicalize(&request.root).unwrap_or_else(|_| request.root.clone());
            self.ancestors.push(root);
        }

        let result = self.scan_dir(&request.root, &compiled, request.recursive);
        self.ancestors.clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::scanner::suffix::LANE_WIDTH;
    use tempfile::TempDir;

    fn compile(exts: &[&str], ignores: &[&str]) -> CompiledFilters {
        let filters = FilterSet::new(exts.iter().copied(), ignores.iter().copied());
        CompiledFilters::compile(&filters, &ScannerLimits::default()).unwrap()
    }

    #[test]
    fn compiled_extensions_follow_extension_semantics() {
        let c = compile(&[".gz", "_"], &[]);
        assert!(!c.extension_rejects(b"a.tar.gz"));
        assert!(!c.extension_rejects(b"Makefile"));
        assert!(c.extension_rejects(b"a.txt"));
    }

    #[test]
    fn multi_dot_extension_never_matches() {
        let c = compile(&[".tar.gz"], &[]);
        assert!(c.ext_active);
        assert!(c.patterns.is_empty());
        assert!(c.extension_rejects(b"a.tar.gz"));
    }

    #[test]
    fn too_many_filters_fail_loudly() {
        let limits = ScannerLimits {
            max_ext_filters: 2,
            max_ignore_filters: 1,
            ..ScannerLimits::default()
        };
        let exts = FilterSet::new([".a", ".b", ".c"], Vec::<&str>::new());
        assert_eq!(
            CompiledFilters::compile(&exts, &limits).unwrap_err(),
            CapacityError::TooManyExtensions { count: 3, limit: 2 }
        );
        let ignores = FilterSet::new(Vec::<&str>::new(), ["x", "y"]);
        assert_eq!(
            CompiledFilters::compile(&ignores, &limits).unwrap_err(),
            CapacityError::TooManyIgnores { count: 2, limit: 1 }
        );
    }

    #[test]
    fn oversized_extension_fails_loudly() {
        let filters = FilterSet::new([".a_really_long_extension"], Vec::<&str>::new());
        let err = CompiledFilters::compile(&filters, &ScannerLimits::default()).unwrap_err();
        assert!(matches!(err, CapacityError::ExtensionTooLong { limit, .. } if limit == LANE_WIDTH));
    }

    #[test]
    fn rejected_dot_entries_render_like_portable_paths() {
        let base = PathBuf::from("/work");
        let mut scanner = AcceleratedScanner::new(ScanOptions::new(&base));
        assert_eq!(
            scanner.child_display(b".hidden"),
            normalize(&base.join(".hidden"), &base)
        );
        scanner.relative.extend_from_slice(b"proj/sub");
        assert_eq!(
            scanner.child_display(b".env"),
            normalize(&base.join("proj").join("sub").join(".env"), &base)
        );
    }

    #[test]
    fn long_path_fails_instead_of_truncating() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("abcdefgh").join("ijklmnop");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("file.txt"), b"").unwrap();

        let limits = ScannerLimits {
            max_path_len: 20,
            ..ScannerLimits::default()
        };
        let mut scanner = AcceleratedScanner::with_limits(ScanOptions::new(dir.path()), limits);
        let request = ScanRequest::new(dir.path(), true);
        let err = scanner.scan(&FilterSet::default(), &request).unwrap_err();
        assert!(matches!(
            err,
            ScanError::Capacity(CapacityError::PathTooLong { limit: 20, .. })
        ));
    }
}
