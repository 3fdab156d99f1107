//! Fingerprints the file layout of directory trees.
//!
//! A tree hash is the XOR of the XXH64 digests of every base-relative file
//! path that survives the active filter. File contents are never read.

pub mod app;
