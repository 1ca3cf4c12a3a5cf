//! Clips: per-entry processing, photo composition and letterboxing.

/// Timeline entry to clip.
pub mod entry;
/// Owned clip handles.
pub mod handle;
/// Aspect-preserving placement on the output canvas.
pub mod letterbox;
/// Photo decoding and vertical composition.
pub mod photo;
