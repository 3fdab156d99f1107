use std::collections::BTreeSet;
use std::path::PathBuf;

/// 64-bit tree hash. `0` is the empty contribution; digests combine by XOR.
pub type Digest = u64;

/// Extension value standing for "file has no extension".
pub const NO_EXTENSION: &str = "";

/// Input-list token that maps to [`NO_EXTENSION`].
pub const NO_EXTENSION_TOKEN: &str = "_";

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub base: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub defaults: FilterSet,
    pub scanner: String,
    pub follow_symlinks: bool,
    pub verbose: bool,
    pub print_time: bool,
}

/// Active extension allow-set and ignore list.
///
/// An empty extension set matches every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub extensions: BTreeSet<String>,
    pub ignores: Vec<String>,
}

impl FilterSet {
    pub fn new<E, I>(extensions: E, ignores: I) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut set = Self::default();
        for ext in extensions {
            set.add_ext(ext.as_ref());
        }
        for ignore in ignores {
            set.add_ignore(ignore.as_ref());
        }
        set
    }

    /// Adds an extension, prepending the dot when missing. `_` and `""` mean "no extension".
    pub fn add_ext(&mut self, ext: &str) {
        let ext = ext.trim();
        let normalized = if ext.is_empty() || ext == NO_EXTENSION_TOKEN {
            NO_EXTENSION.to_string()
        } else if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{ext}")
        };
        self.extensions.insert(normalized);
    }

    pub fn add_ignore(&mut self, pattern: &str) {
        let pattern = pattern.trim().replace('\\', "/");
        if pattern.is_empty() || self.ignores.contains(&pattern) {
            return;
        }
        self.ignores.push(pattern);
    }

    pub fn reset_exts(&mut self, defaults: &FilterSet) {
        self.extensions = defaults.extensions.clone();
    }

    pub fn reset_ignores(&mut self, defaults: &FilterSet) {
        self.ignores = defaults.ignores.clone();
    }

    /// Replaces the category named by the directive with its values.
    pub fn apply(&mut self, directive: &Directive) {
        match directive.kind {
            DirectiveKind::Extensions => {
                self.extensions.clear();
                for value in &directive.values {
                    self.add_ext(value);
                }
            }
            DirectiveKind::Ignores => {
                self.ignores.clear();
                for value in &directive.values {
                    self.add_ignore(value);
                }
            }
        }
    }
}

/// One folder to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub root: PathBuf,
    pub recursive: bool,
}

impl ScanRequest {
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            root: root.into(),
            recursive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Extensions,
    Ignores,
}

impl DirectiveKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ext" | "exts" | "extensions" => Some(Self::Extensions),
            "ignore" | "ignores" => Some(Self::Ignores),
            _ => None,
        }
    }
}

/// A parsed `[name values...]` input-list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_ext_normalizes_dot_and_sentinel() {
        let mut set = FilterSet::default();
        set.add_ext("txt");
        set.add_ext(".cpp");
        set.add_ext("_");
        let exts: Vec<_> = set.extensions.iter().cloned().collect();
        assert_eq!(exts, vec!["", ".cpp", ".txt"]);
    }

    #[test]
    fn apply_replaces_only_named_category() {
        let mut set = FilterSet::new([".rs"], ["target"]);
        set.apply(&Directive {
            kind: DirectiveKind::Extensions,
            values: vec![".txt".into(), ".md".into()],
        });
        assert!(set.extensions.contains(".txt"));
        assert!(!set.extensions.contains(".rs"));
        assert_eq!(set.ignores, vec!["target".to_string()]);

        set.apply(&Directive {
            kind: DirectiveKind::Ignores,
            values: vec![],
        });
        assert!(set.ignores.is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let defaults = FilterSet::new([".rs"], ["build"]);
        let mut set = FilterSet::new([".txt"], ["tmp", "out"]);
        set.reset_exts(&defaults);
        assert_eq!(set.extensions, defaults.extensions);
        assert_eq!(set.ignores.len(), 2);
        set.reset_ignores(&defaults);
        assert_eq!(set, defaults);
    }

    #[test]
    fn ignores_use_forward_slashes() {
        let set = FilterSet::new(Vec::<&str>::new(), ["src\\gen", "src\\gen"]);
        assert_eq!(set.ignores, vec!["src/gen".to_string()]);
    }
}
