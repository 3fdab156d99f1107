//! Fixed-width suffix comparison used by the accelerated backend.
//!
//! An extension of up to [`LANE_WIDTH`] bytes is stored right-aligned in a
//! 16-byte lane together with a mask covering exactly its bytes. A file name
//! matches when the masked tail of the name equals the pattern lane.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::app::error::CapacityError;

pub const LANE_WIDTH: usize = 16;

pub type Lane = [u8; LANE_WIDTH];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixPattern {
    pattern: Lane,
    mask: Lane,
}

impl SuffixPattern {
    pub fn new(suffix: &[u8]) -> Result<Self, CapacityError> {
        if suffix.len() > LANE_WIDTH {
            return Err(CapacityError::ExtensionTooLong {
                ext: String::from_utf8_lossy(suffix).into_owned(),
                limit: LANE_WIDTH,
            });
        }
        let mut pattern = [0u8; LANE_WIDTH];
        let mut mask = [0u8; LANE_WIDTH];
        let start = LANE_WIDTH - suffix.len();
        pattern[start..].copy_from_slice(suffix);
        mask[start..].fill(0xFF);
        Ok(Self { pattern, mask })
    }

    pub fn matches(&self, tail: &Lane) -> bool {
        byte_suffix_matches(&self.pattern, &self.mask, tail)
    }
}

/// Last [`LANE_WIDTH`] bytes of `name`, zero padded on the left.
///
/// Names never contain NUL, so the padding cannot satisfy a pattern byte.
pub fn load_tail(name: &[u8]) -> Lane {
    let mut lane = [0u8; LANE_WIDTH];
    let take = name.len().min(LANE_WIDTH);
    lane[LANE_WIDTH - take..].copy_from_slice(&name[name.len() - take..]);
    lane
}

/// `(candidate & mask) == pattern`, over all 16 bytes.
#[inline]
pub fn byte_suffix_matches(pattern: &Lane, mask: &Lane, candidate: &Lane) -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        // SAFETY: SSE2 is part of the x86_64 baseline and the loads are unaligned.
        unsafe { matches_sse2(pattern, mask, candidate) }
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        matches_scalar(pattern, mask, candidate)
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn matches_sse2(pattern: &Lane, mask: &Lane, candidate: &Lane) -> bool {
    let p = _mm_loadu_si128(pattern.as_ptr().cast::<__m128i>());
    let m = _mm_loadu_si128(mask.as_ptr().cast::<__m128i>());
    let c = _mm_loadu_si128(candidate.as_ptr().cast::<__m128i>());
    let eq = _mm_cmpeq_epi8(_mm_and_si128(c, m), p);
    _mm_movemask_epi8(eq) == 0xFFFF
}

#[cfg_attr(target_arch = "x86_64", allow(dead_code))]
fn matches_scalar(pattern: &Lane, mask: &Lane, candidate: &Lane) -> bool {
    pattern
        .iter()
        .zip(mask)
        .zip(candidate)
        .all(|((p, m), c)| c & m == *p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(suffix: &str, name: &str) -> bool {
        SuffixPattern::new(suffix.as_bytes())
            .unwrap()
            .matches(&load_tail(name.as_bytes()))
    }

    #[test]
    fn matches_exact_suffix() {
        assert!(matches(".txt", "a.txt"));
        assert!(matches(".txt", "archive.tar.txt"));
        assert!(!matches(".txt", "a.txt.bak"));
        assert!(!matches(".txt", "a.tx"));
        assert!(matches(".", "trail."));
    }

    #[test]
    fn short_names_do_not_match_longer_patterns() {
        assert!(!matches(".json", "json"));
        assert!(!matches(".rs", "s"));
        assert!(matches(".rs", ".rs"));
    }

    #[test]
    fn long_names_use_their_tail() {
        let name = "a_very_long_file_name_that_exceeds_the_lane.md";
        assert!(matches(".md", name));
        assert!(!matches(".rs", name));
    }

    #[test]
    fn full_width_pattern() {
        let ext = ".abcdefghijklmno";
        assert_eq!(ext.len(), LANE_WIDTH);
        assert!(matches(ext, "x.abcdefghijklmno"));
        assert!(!matches(ext, "x.bbcdefghijklmno"));
    }

    #[test]
    fn rejects_oversized_pattern() {
        let err = SuffixPattern::new(b".abcdefghijklmnop").unwrap_err();
        assert!(matches!(err, CapacityError::ExtensionTooLong { limit: 16, .. }));
    }

    #[test]
    fn vector_and_scalar_agree() {
        let names = ["a.txt", "b.cpp", "Makefile", "x", "a_long_name_with.many.dots.rs", ""];
        let suffixes = [".txt", ".rs", ".", ".cpp", "e", ".dots.rs"];
        for suffix in suffixes {
            let p = SuffixPattern::new(suffix.as_bytes()).unwrap();
            for name in names {
                let tail = load_tail(name.as_bytes());
                assert_eq!(
                    byte_suffix_matches(&p.pattern, &p.mask, &tail),
                    matches_scalar(&p.pattern, &p.mask, &tail),
                    "{suffix} vs {name}"
                );
                assert_eq!(p.matches(&tail), name.ends_with(suffix), "{suffix} vs {name}");
            }
        }
    }
}
