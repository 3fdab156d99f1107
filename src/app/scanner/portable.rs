use crate::app::error::ScanError;
use crate::app::filter::PathFilter;
use crate::app::hasher::{normalize, PathHasher};
use crate::app::models::{Digest, FilterSet, ScanRequest};
use crate::app::scanner::{ScanOptions, TreeScanner};
use ignore::{DirEntry, WalkBuilder};
use std::fs;

/// Backend built on the `ignore` crate's walker.
pub struct PortableScanner {
    options: ScanOptions,
}

impl PortableScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Whether a yielded entry should be hashed as a file.
    fn is_hashable_file(&self, entry: &DirEntry) -> bool {
        let Some(file_type) = entry.file_type() else {
            return false;
        };
        if file_type.is_file() {
            return true;
        }
        // Unfollowed links still count when they point at a file.
        file_type.is_symlink()
            && !self.options.follow_symlinks
            && fs::metadata(entry.path()).map_or(false, |m| m.is_file())
    }
}

impl TreeScanner for PortableScanner {
    fn name(&self) -> &'static str {
        "portable"
    }

    fn scan(&mut self, filters: &FilterSet, request: &ScanRequest) -> Result<Digest, ScanError> {
        let base = self.options.base();
        let hasher = PathHasher::new(base);
        let filter = PathFilter::new(filters.clone(), base);
        let filter_base = base.to_path_buf();

        // Standard filters (hidden, .gitignore, ...) are off; PathFilter owns every rule.
        let walker = WalkBuilder::new(&request.root)
            .standard_filters(false)
            .follow_links(self.options.follow_symlinks)
            .max_depth(if request.recursive { None } else { Some(1) })
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().map_or(false, |ft| ft.is_dir());
                let excluded = filter.is_excluded(entry.path(), is_dir);
                if excluded && !is_dir {
                    log::debug!("   {}", normalize(entry.path(), &filter_base));
                }
                !excluded
            })
            .build();

        let mut hash: Digest = 0;
        for result in walker {
            self.options.cancel.check()?;
            match result {
                Ok(entry) => {
                    if entry.depth() == 0 || !self.is_hashable_file(&entry) {
                        continue;
                    }
                    let digest = hasher.hash(entry.path());
                    log::debug!(" * {}", normalize(entry.path(), base));
                    hash ^= digest;
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        Ok(hash)
    }
}
