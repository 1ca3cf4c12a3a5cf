//! Media inspection and frame-rate normalization.

/// Constant-frame-rate conversion cache.
pub mod cfr;
/// `ffprobe` reports and variable-frame-rate detection.
pub mod probe;
