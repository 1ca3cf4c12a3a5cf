use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::foundation::error::ReelResult;

/// Where a clip's frames come from.
#[derive(Debug)]
pub enum ClipSource {
    /// A window of a video file starting at `in_point` seconds.
    Video {
        /// File to read (the original or its constant-frame-rate conversion).
        path: PathBuf,
        /// Trim start in seconds.
        in_point: f64,
    },
    /// A composed still frame owned by the clip; deleted when the clip is released.
    Still {
        /// PNG on disk.
        image: TempPath,
    },
}

/// Record of an `end` that ran past the real media duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clamp {
    /// `end` as requested by the timeline.
    pub requested_end: f64,
    /// `end` actually used (the media duration).
    pub actual_end: f64,
}

/// A trimmed, playable unit produced for one timeline entry.
///
/// Owned by exactly one pipeline stage at a time. Release with [`ClipHandle::close`] to
/// observe failures; dropping also releases any owned still frame.
#[derive(Debug)]
pub struct ClipHandle {
    label: String,
    source: ClipSource,
    duration: f64,
    width: u32,
    height: u32,
    has_audio: bool,
    clamp: Option<Clamp>,
}

impl ClipHandle {
    /// Clip over `[in_point, in_point + duration)` of a video file.
    pub fn video(
        label: impl Into<String>,
        path: impl Into<PathBuf>,
        in_point: f64,
        duration: f64,
        (width, height): (u32, u32),
        has_audio: bool,
    ) -> Self {
        Self {
            label: label.into(),
            source: ClipSource::Video {
                path: path.into(),
                in_point,
            },
            duration,
            width,
            height,
            has_audio,
            clamp: None,
        }
    }

    /// Silent clip showing one still frame for `duration` seconds.
    pub fn still(
        label: impl Into<String>,
        image: TempPath,
        duration: f64,
        (width, height): (u32, u32),
    ) -> Self {
        Self {
            label: label.into(),
            source: ClipSource::Still { image },
            duration,
            width,
            height,
            has_audio: false,
            clamp: None,
        }
    }

    pub(crate) fn with_clamp(mut self, clamp: Clamp) -> Self {
        self.clamp = Some(clamp);
        self
    }

    /// Timeline key this clip was built from.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Frame source.
    pub fn source(&self) -> &ClipSource {
        &self.source
    }

    /// File the renderer reads.
    pub fn source_path(&self) -> &Path {
        match &self.source {
            ClipSource::Video { path, .. } => path.as_path(),
            ClipSource::Still { image } => &**image,
        }
    }

    /// Trim start within the source file (always `0` for stills).
    pub fn in_point(&self) -> f64 {
        match self.source {
            ClipSource::Video { in_point, .. } => in_point,
            ClipSource::Still { .. } => 0.0,
        }
    }

    /// Exact clip duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Frame size `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the source carries an audio track.
    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    /// Set when the requested `end` was clamped to the media duration.
    pub fn clamp(&self) -> Option<Clamp> {
        self.clamp
    }

    /// Release the clip and any file it owns.
    pub fn close(self) -> ReelResult<()> {
        match self.source {
            ClipSource::Video { .. } => Ok(()),
            ClipSource::Still { image } => Ok(image.close()?),
        }
    }
}

/// Close every clip, logging (not returning) failures. Returns how many closed cleanly.
pub fn release_all(clips: impl IntoIterator<Item = ClipHandle>) -> usize {
    let mut ok = 0;
    for clip in clips {
        let label = clip.label.clone();
        match clip.close() {
            Ok(()) => ok += 1,
            Err(e) => tracing::warn!(clip = %label, error = %e, "failed to release clip"),
        }
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_a_still_removes_its_file() {
        let file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .unwrap();
        let path = file.path().to_path_buf();
        let clip = ClipHandle::still("a.jpg", file.into_temp_path(), 3.0, (1080, 1920));
        assert!(path.exists());
        assert_eq!(clip.source_path(), path.as_path());
        assert!(!clip.has_audio());
        clip.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn release_all_counts_clean_closes() {
        let clips = vec![
            ClipHandle::video("a.mp4", "a.mp4", 1.0, 2.0, (640, 360), true),
            ClipHandle::video("b.mp4", "b.mp4", 0.0, 5.0, (360, 640), false),
        ];
        assert_eq!(clips[0].in_point(), 1.0);
        assert_eq!(release_all(clips), 2);
    }
}
