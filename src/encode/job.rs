use std::path::{Path, PathBuf};

use crate::{
    clip::{
        handle::ClipSource,
        letterbox::{LetterboxedClip, Placement},
    },
    foundation::core::Canvas,
};

/// Encoder options for the final render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOpts {
    /// Output frame rate.
    pub fps: u32,
    /// Video codec passed to `-c:v`.
    pub video_codec: String,
    /// Audio codec passed to `-c:a`.
    pub audio_codec: String,
    /// Encoder worker threads (`-threads`), at least one.
    pub threads: usize,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl RenderOpts {
    /// `libx264`/`aac` at `fps`, one thread, overwriting.
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            threads: 1,
            overwrite: true,
        }
    }

    /// Set the worker thread count (clamped to at least one).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }
}

/// One segment of the reel, in concatenation order.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderInput {
    /// Timeline key the segment came from.
    pub label: String,
    /// File to read.
    pub path: PathBuf,
    /// `true` for a looped still image.
    pub still: bool,
    /// Seek position within `path`.
    pub in_point: f64,
    /// Exact segment duration.
    pub duration: f64,
    /// Scaled size and offset on the canvas.
    pub placement: Placement,
    /// Whether `path` has an audio track to keep.
    pub has_audio: bool,
}

/// Everything the renderer needs to produce the final file.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderJob {
    /// Output path.
    pub out_path: PathBuf,
    /// Output frame size.
    pub canvas: Canvas,
    /// Encoder options.
    pub opts: RenderOpts,
    /// Segments in playback order.
    pub inputs: Vec<RenderInput>,
}

impl RenderJob {
    /// Describe the concatenation of `clips` in order.
    pub fn from_clips(
        clips: &[LetterboxedClip],
        canvas: Canvas,
        out_path: &Path,
        opts: RenderOpts,
    ) -> Self {
        let inputs = clips
            .iter()
            .map(|boxed| {
                let clip = boxed.clip();
                RenderInput {
                    label: clip.label().to_string(),
                    path: clip.source_path().to_path_buf(),
                    still: matches!(clip.source(), ClipSource::Still { .. }),
                    in_point: clip.in_point(),
                    duration: clip.duration(),
                    placement: boxed.placement(),
                    has_audio: boxed.has_audio(),
                }
            })
            .collect();

        Self {
            out_path: out_path.to_path_buf(),
            canvas,
            opts,
            inputs,
        }
    }

    /// Sum of segment durations.
    pub fn total_duration(&self) -> f64 {
        self.inputs.iter().map(|i| i.duration).sum()
    }
}
