//! reelcut assembles vertical short-form videos ("reels") from an ordered timeline of photos
//! and video clips.
//!
//! - Load a [`Timeline`] (`filename -> {start, end, crossfade, type, video_resampling}`)
//! - Run a [`ReelAssembler`] over it with a [`MediaToolchain`] (usually [`FfmpegToolchain`])
//! - Inspect the [`ReelOutcome`]: a rendered reel or "no valid clips"
//!
//! Entries that fail are skipped, entries that do not fit the duration budget are left out,
//! and variable-frame-rate videos can be converted to constant rate first.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Reel assembly runs.
pub mod assemble;
/// Clip construction and letterboxing.
pub mod clip;
/// Final render.
pub mod encode;
mod foundation;
/// Probing and frame-rate normalization.
pub mod media;
/// Timeline input.
pub mod timeline;
pub mod toolchain;

pub use crate::assemble::{
    ClipSummary, ReelAssembler, ReelOutcome, ReelReport,
    accumulate::{Accumulator, Offer, SkipReason, SkippedEntry},
    settings::ReelSettings,
};
pub use crate::clip::{
    entry::EntryProcessor,
    handle::{Clamp, ClipHandle, ClipSource},
    letterbox::{LetterboxedClip, Placement, letterbox},
};
pub use crate::encode::job::{RenderInput, RenderJob, RenderOpts};
pub use crate::foundation::core::{Canvas, Ratio};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::media::{
    cfr::CfrCache,
    probe::{FrameRateProbe, ProbeReport, probe_frame_rate},
};
pub use crate::timeline::{
    loader::{detect_kind, load_timeline, parse_timeline, save_timeline, timeline_from_folder},
    model::{MediaEntry, MediaKind, RawEntry, Timeline},
};
pub use crate::toolchain::{FfmpegToolchain, MediaToolchain};
