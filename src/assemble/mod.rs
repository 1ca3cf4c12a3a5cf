//! Reel assembly: per-entry accumulation, composition, render and cleanup.
//!
//! A run walks the timeline in order, turns each entry into a clip, keeps the clips that fit
//! the duration budget, letterboxes them onto the output canvas and renders them as one MP4.
//! Clip handles and constant-frame-rate conversions are released on every exit path.

/// Budgeted, ordered clip accumulation.
pub mod accumulate;
/// Run settings.
pub mod settings;

use std::path::{Path, PathBuf};

use crate::{
    assemble::{
        accumulate::{Accumulator, SkippedEntry},
        settings::ReelSettings,
    },
    clip::{
        entry::EntryProcessor,
        handle::{Clamp, ClipHandle, release_all},
        letterbox::{LetterboxedClip, letterbox},
    },
    encode::job::RenderJob,
    foundation::error::ReelResult,
    media::cfr::CfrCache,
    timeline::model::{MediaEntry, Timeline},
    toolchain::MediaToolchain,
};

/// One clip that made it into the reel.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipSummary {
    /// Timeline key.
    pub name: String,
    /// Clip duration in seconds.
    pub duration: f64,
    /// Source frame size.
    pub size: (u32, u32),
    /// Set when the entry's `end` was clamped.
    pub clamp: Option<Clamp>,
}

impl ClipSummary {
    fn of(clip: &ClipHandle) -> Self {
        Self {
            name: clip.label().to_string(),
            duration: clip.duration(),
            size: clip.size(),
            clamp: clip.clamp(),
        }
    }
}

/// Summary of a rendered reel.
#[derive(Clone, Debug, PartialEq)]
pub struct ReelReport {
    /// Rendered file.
    pub output: PathBuf,
    /// Clips in playback order.
    pub clips: Vec<ClipSummary>,
    /// Entries left out, in timeline order.
    pub skipped: Vec<SkippedEntry>,
    /// Sum of clip durations.
    pub total_duration: f64,
}

/// How a run ended without a fatal error.
#[derive(Clone, Debug, PartialEq)]
pub enum ReelOutcome {
    /// The reel was written.
    Rendered(ReelReport),
    /// Every entry was skipped; nothing was written.
    NoClips {
        /// Entries left out, in timeline order.
        skipped: Vec<SkippedEntry>,
    },
}

/// Drives a reel assembly run over a [`MediaToolchain`].
pub struct ReelAssembler<T> {
    settings: ReelSettings,
    tools: T,
}

impl<T: MediaToolchain> ReelAssembler<T> {
    /// Create an assembler.
    pub fn new(settings: ReelSettings, tools: T) -> Self {
        Self { settings, tools }
    }

    /// Run settings.
    pub fn settings(&self) -> &ReelSettings {
        &self.settings
    }

    /// The toolchain used for probing, conversion and rendering.
    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Assemble `timeline` into `output` with a fresh conversion cache.
    pub fn run(
        &self,
        timeline: &Timeline,
        media_root: &Path,
        output: &Path,
    ) -> ReelResult<ReelOutcome> {
        let mut cfr = CfrCache::new(&self.settings.cache_dir);
        self.run_with_cache(timeline, media_root, output, &mut cfr)
    }

    /// Assemble `timeline` into `output`, reusing `cfr` as the run's conversion cache.
    ///
    /// The cache is purged before and after the run. Only render-stage failures escape;
    /// per-entry failures become [`SkippedEntry`] records.
    #[tracing::instrument(skip_all, fields(entries = timeline.len(), out = %output.display()))]
    pub fn run_with_cache(
        &self,
        timeline: &Timeline,
        media_root: &Path,
        output: &Path,
        cfr: &mut CfrCache,
    ) -> ReelResult<ReelOutcome> {
        self.settings.validate()?;

        let leftovers = cfr.purge();
        if leftovers > 0 {
            tracing::info!(removed = leftovers, "purged leftover cfr files");
        }

        let still_dir = self.settings.still_dir();
        let processor =
            EntryProcessor::new(&self.tools, media_root, &still_dir, self.settings.canvas);
        let mut acc = Accumulator::new(self.settings.max_duration_sec);
        for (name, raw) in timeline {
            let result =
                MediaEntry::from_raw(name, raw).and_then(|entry| processor.process(cfr, &entry));
            acc.offer(name, result);
        }
        let total = acc.total();
        let (clips, skipped) = acc.finish();

        let outcome = self.compose_and_write(clips, skipped, total, output);

        let removed = cfr.purge();
        tracing::debug!(removed, "cleanup finished");
        outcome
    }

    fn compose_and_write(
        &self,
        clips: Vec<ClipHandle>,
        skipped: Vec<SkippedEntry>,
        total_duration: f64,
        output: &Path,
    ) -> ReelResult<ReelOutcome> {
        if clips.is_empty() {
            tracing::warn!(skipped = skipped.len(), "no valid clips to assemble");
            return Ok(ReelOutcome::NoClips { skipped });
        }

        let summaries: Vec<ClipSummary> = clips.iter().map(ClipSummary::of).collect();
        let boxed: Vec<LetterboxedClip> = clips
            .into_iter()
            .map(|clip| letterbox(clip, self.settings.canvas))
            .collect();

        let job = RenderJob::from_clips(
            &boxed,
            self.settings.canvas,
            output,
            self.settings.render_opts(),
        );
        let rendered = self.tools.render(&job);
        release_all(boxed.into_iter().map(LetterboxedClip::into_clip));
        rendered?;

        tracing::info!(
            out = %output.display(),
            clips = summaries.len(),
            skipped = skipped.len(),
            total_duration,
            "reel written"
        );
        Ok(ReelOutcome::Rendered(ReelReport {
            output: output.to_path_buf(),
            clips: summaries,
            skipped,
            total_duration,
        }))
    }
}
