//! Timeline input: the ordered `filename -> entry` mapping that drives a reel.

/// JSON loading, saving and folder templates.
pub mod loader;
/// On-disk and typed entry records.
pub mod model;
