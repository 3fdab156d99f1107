use crate::app::models::Digest;
use pathdiff::diff_paths;
use std::path::{Component, Path};
use xxhash_rust::xxh64::xxh64;

/// Fixed seed so digests are reproducible across machines and runs.
pub const HASH_SEED: u64 = 0;

/// Maps paths to digests relative to a base directory.
#[derive(Debug, Clone, Copy)]
pub struct PathHasher<'a> {
    base: &'a Path,
}

impl<'a> PathHasher<'a> {
    pub fn new(base: &'a Path) -> Self {
        Self { base }
    }

    pub fn hash(&self, path: &Path) -> Digest {
        hash_normalized(normalize(path, self.base).as_bytes())
    }
}

/// Hashes an already normalized relative path.
pub fn hash_normalized(relative: &[u8]) -> Digest {
    xxh64(relative, HASH_SEED)
}

/// Renders `path` relative to `base` with `/` separators on every platform.
pub fn normalize(path: &Path, base: &Path) -> String {
    let relative = diff_paths(path, base).unwrap_or_else(|| path.to_path_buf());
    let mut out = String::new();
    for component in relative.components() {
        if matches!(component, Component::CurDir) {
            continue;
        }
        if !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn normalize_is_relative_with_forward_slashes() {
        let base = PathBuf::from("/work/base");
        let path = base.join("src").join("app").join("main.rs");
        assert_eq!(normalize(&path, &base), "src/app/main.rs");
        assert_eq!(normalize(&base, &base), "");
    }

    #[test]
    fn normalize_walks_up_outside_base() {
        let base = PathBuf::from("/work/base");
        let path = PathBuf::from("/work/other/a.txt");
        assert_eq!(normalize(&path, &base), "../other/a.txt");
    }

    #[test]
    fn hash_is_deterministic_and_seeded() {
        let base = PathBuf::from("/work");
        let hasher = PathHasher::new(&base);
        let digest = hasher.hash(&base.join("a.txt"));
        assert_eq!(digest, xxh64(b"a.txt", 0));
        assert_eq!(digest, hash_normalized(b"a.txt"));
        assert_ne!(digest, hash_normalized(b"b.txt"));
    }

    #[test]
    fn empty_path_hashes_to_xxh64_of_nothing() {
        // xxh64("", 0) reference value
        assert_eq!(hash_normalized(b""), 0xEF46_DB37_51D8_E999);
    }
}
