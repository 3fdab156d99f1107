use crate::app::error::{ScanError, TreeHashError};
use crate::app::models::{Digest, Directive, DirectiveKind, FilterSet, ScanRequest};
use crate::app::scanner::TreeScanner;
use std::fs;
use std::path::Path;

/// One classified input-list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Skip,
    Directive(Directive),
    UnknownDirective(String),
    Malformed(String),
    Folder { path: String, recursive: bool },
}

pub fn parse_line(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Skip;
    }
    if let Some(body) = line.strip_prefix('[') {
        return parse_directive(body);
    }

    match line.strip_suffix('*') {
        Some(folder) => Line::Folder {
            path: folder.trim_end().to_string(),
            recursive: true,
        },
        None => Line::Folder {
            path: line.to_string(),
            recursive: false,
        },
    }
}

/// `body` is everything after the opening bracket. Values may sit inside the
/// brackets after the name, after the closing bracket, or both.
fn parse_directive(body: &str) -> Line {
    let Some(close) = body.find(']') else {
        return Line::Malformed(format!("[{body}"));
    };
    let inner = body[..close].trim();
    let trailing = &body[close + 1..];

    let (name, inner_values) = match inner.find(|c: char| c.is_whitespace() || c == '|') {
        Some(split) => (&inner[..split], &inner[split..]),
        None => (inner, ""),
    };

    let Some(kind) = DirectiveKind::from_name(&name.to_ascii_lowercase()) else {
        return Line::UnknownDirective(name.to_string());
    };

    let mut values = split_values(kind, inner_values);
    values.extend(split_values(kind, trailing));
    Line::Directive(Directive { kind, values })
}

/// Extensions split on whitespace or `|`; ignores only on `|` so they may hold spaces.
fn split_values(kind: DirectiveKind, text: &str) -> Vec<String> {
    let parts: Vec<&str> = match kind {
        DirectiveKind::Extensions => text
            .split(|c: char| c.is_whitespace() || c == '|')
            .collect(),
        DirectiveKind::Ignores => text.split('|').collect(),
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drives filter directives and folder scans for one input list.
pub struct InputListParser<'a> {
    scanner: &'a mut dyn TreeScanner,
    base: &'a Path,
    defaults: &'a FilterSet,
}

impl<'a> InputListParser<'a> {
    pub fn new(scanner: &'a mut dyn TreeScanner, base: &'a Path, defaults: &'a FilterSet) -> Self {
        Self {
            scanner,
            base,
            defaults,
        }
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<Digest, TreeHashError> {
        let text = fs::read_to_string(path)
            .map_err(|e| TreeHashError::ReadInputList(path.to_path_buf(), e))?;
        Ok(self.parse(&text)?)
    }

    /// Each directive only affects folder lines after it.
    pub fn parse(&mut self, text: &str) -> Result<Digest, ScanError> {
        let mut active = self.defaults.clone();
        let mut hash: Digest = 0;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        for (index, raw) in text.lines().enumerate() {
            match parse_line(raw) {
                Line::Skip => {}
                Line::Directive(directive) => active.apply(&directive),
                Line::UnknownDirective(name) => {
                    log::warn!("Line {}: unknown directive \"{}\" ignored", index + 1, name);
                }
                Line::Malformed(line) => {
                    log::warn!("Line {}: malformed directive \"{}\" ignored", index + 1, line);
                }
                Line::Folder { path, recursive } => {
                    let root = self.base.join(&path);
                    if !root.is_dir() {
                        log::warn!("Line {}: folder {} not found", index + 1, root.display());
                        continue;
                    }
                    hash ^= self.scanner.scan(&active, &ScanRequest::new(root, recursive))?;
                }
            }
        }
        Ok(hash)
    }
}

/// Hashes one top-level input: an input-list file, or a folder scanned recursively.
pub fn hash_input(
    input: &Path,
    base: &Path,
    defaults: &FilterSet,
    scanner: &mut dyn TreeScanner,
) -> Result<Digest, TreeHashError> {
    let path = base.join(input);
    if path.is_file() {
        InputListParser::new(scanner, base, defaults).parse_file(&path)
    } else if path.is_dir() {
        Ok(scanner.scan(defaults, &ScanRequest::new(path, true))?)
    } else {
        Err(TreeHashError::InputNotFound(path))
    }
}
