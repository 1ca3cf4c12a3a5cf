use std::path::PathBuf;

use crate::{
    encode::{ffmpeg::worker_threads, job::RenderOpts},
    foundation::{
        core::Canvas,
        error::{ReelError, ReelResult},
    },
};

/// Knobs for one reel assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct ReelSettings {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: u32,
    /// Total duration budget in seconds.
    pub max_duration_sec: f64,
    /// Video codec for the final render.
    pub video_codec: String,
    /// Audio codec for the final render.
    pub audio_codec: String,
    /// Cores left free when sizing the encoder thread pool.
    pub reserved_cores: usize,
    /// Where constant-frame-rate conversions are written.
    pub cache_dir: PathBuf,
    /// Where composed photo frames are written. System temp dir when `None`.
    pub still_dir: Option<PathBuf>,
    /// Overwrite an existing output file.
    pub overwrite: bool,
}

impl Default for ReelSettings {
    fn default() -> Self {
        Self {
            canvas: Canvas::PORTRAIT_1080,
            fps: 30,
            max_duration_sec: 90.0,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            reserved_cores: 2,
            cache_dir: std::env::temp_dir().join("reelcut-cfr"),
            still_dir: None,
            overwrite: true,
        }
    }
}

impl ReelSettings {
    /// Check the settings before a run.
    pub fn validate(&self) -> ReelResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if self.fps == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if !self.max_duration_sec.is_finite() || self.max_duration_sec <= 0.0 {
            return Err(ReelError::validation(
                "max reel duration must be a positive number of seconds",
            ));
        }
        if self.video_codec.is_empty() || self.audio_codec.is_empty() {
            return Err(ReelError::validation("codecs must be non-empty"));
        }
        Ok(())
    }

    /// Set the canvas.
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    /// Set the output frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the duration budget.
    pub fn with_max_duration(mut self, secs: f64) -> Self {
        self.max_duration_sec = secs;
        self
    }

    /// Set the conversion cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set the composed-photo directory.
    pub fn with_still_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.still_dir = Some(dir.into());
        self
    }

    /// Directory for composed photo frames.
    pub fn still_dir(&self) -> PathBuf {
        self.still_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Encoder options derived from these settings.
    pub fn render_opts(&self) -> RenderOpts {
        RenderOpts {
            fps: self.fps,
            video_codec: self.video_codec.clone(),
            audio_codec: self.audio_codec.clone(),
            threads: worker_threads(self.reserved_cores),
            overwrite: self.overwrite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_portrait_reel() {
        let s = ReelSettings::default();
        s.validate().unwrap();
        assert_eq!(s.canvas, Canvas::PORTRAIT_1080);
        assert_eq!(s.max_duration_sec, 90.0);
        assert!(s.render_opts().threads >= 1);
    }

    #[test]
    fn validate_catches_bad_values() {
        assert!(ReelSettings::default().with_fps(0).validate().is_err());
        assert!(
            ReelSettings::default()
                .with_max_duration(0.0)
                .validate()
                .is_err()
        );
        assert!(
            ReelSettings::default()
                .with_canvas(Canvas {
                    width: 1081,
                    height: 1920
                })
                .validate()
                .is_err()
        );
    }
}
