mod accelerated;
mod portable;
mod suffix;

pub use accelerated::{AcceleratedScanner, ScannerLimits};
pub use portable::PortableScanner;

use crate::app::error::ScanError;
use crate::app::models::{Digest, FilterSet, ScanRequest};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Walks one root and folds the digests of every accepted file.
///
/// Every implementation must return the same digest for the same tree and
/// filter set. Unreadable directories contribute `0`.
pub trait TreeScanner {
    fn name(&self) -> &'static str;

    fn scan(&mut self, filters: &FilterSet, request: &ScanRequest) -> Result<Digest, ScanError>;
}

/// Policy shared by every backend.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub base: PathBuf,
    pub follow_symlinks: bool,
    pub cancel: CancelToken,
}

impl ScanOptions {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            follow_symlinks: false,
            cancel: CancelToken::default(),
        }
    }

    pub fn follow_symlinks(mut self, yes: bool) -> Self {
        self.follow_symlinks = yes;
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

/// Cooperative cancellation flag, checked between entry visits.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> Result<(), ScanError> {
        if self.is_cancelled() {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Instantiates a backend by name, falling back to the portable one.
pub fn create_scanner(name: &str, options: ScanOptions) -> Box<dyn TreeScanner> {
    match name {
        "portable" | "default" => {
            log::debug!("Creating portable scanner.");
            Box::new(PortableScanner::new(options))
        }
        "accelerated" | "fast" => {
            log::debug!("Creating accelerated scanner.");
            Box::new(AcceleratedScanner::new(options))
        }
        other => {
            log::warn!(
                "Scanner of type \"{}\" isn't supported. Creating portable scanner.",
                other
            );
            Box::new(PortableScanner::new(options))
        }
    }
}
