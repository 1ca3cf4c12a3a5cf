use indexmap::IndexMap;

use crate::foundation::error::{ReelError, ReelResult};

/// Type tag accepted in timeline files for video entries.
pub const VIDEO_TYPE: &str = "video";
/// Type tag accepted in timeline files for photo entries.
pub const PHOTO_TYPE: &str = "photo";

/// One timeline record exactly as it appears on disk.
///
/// ```json
/// "clip.mp4": { "start": 0, "end": 4.5, "crossfade": 1, "type": "video", "video_resampling": 1 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawEntry {
    /// Trim start in seconds.
    pub start: f64,
    /// Trim end in seconds.
    pub end: f64,
    /// Transition descriptor. Carried through, not rendered.
    #[serde(alias = "transition")]
    pub crossfade: f64,
    /// `"video"` or `"photo"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `1` requests constant-frame-rate conversion of variable-rate videos.
    #[serde(default)]
    pub video_resampling: u8,
}

/// Ordered mapping `filename -> entry`; insertion order is reel order.
pub type Timeline = IndexMap<String, RawEntry>;

/// Media-specific part of a [`MediaEntry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    /// Trimmed video clip.
    Video {
        /// Convert variable-rate sources to constant rate before trimming.
        resample: bool,
    },
    /// Still photo shown for the entry's duration.
    Photo,
}

/// Typed, validated timeline entry.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaEntry {
    /// Timeline key, resolved against the media root.
    pub name: String,
    /// Trim start in seconds.
    pub start: f64,
    /// Trim end in seconds, `> start`.
    pub end: f64,
    /// Transition descriptor.
    pub crossfade: f64,
    /// Video or photo.
    pub kind: MediaKind,
}

impl MediaEntry {
    /// Convert an on-disk record, rejecting unknown types and empty windows.
    pub fn from_raw(name: &str, raw: &RawEntry) -> ReelResult<Self> {
        if !raw.start.is_finite() || !raw.end.is_finite() {
            return Err(ReelError::validation(format!(
                "entry '{name}' has a non-finite start/end"
            )));
        }
        if raw.start < 0.0 {
            return Err(ReelError::validation(format!(
                "entry '{name}' has a negative start ({})",
                raw.start
            )));
        }
        if raw.end <= raw.start {
            return Err(ReelError::validation(format!(
                "entry '{name}' must satisfy start < end (got {} >= {})",
                raw.start, raw.end
            )));
        }

        let kind = match raw.kind.as_str() {
            VIDEO_TYPE => MediaKind::Video {
                resample: raw.video_resampling != 0,
            },
            PHOTO_TYPE => MediaKind::Photo,
            other => {
                return Err(ReelError::validation(format!(
                    "entry '{name}' has unsupported type '{other}'"
                )));
            }
        };

        Ok(Self {
            name: name.to_string(),
            start: raw.start,
            end: raw.end,
            crossfade: raw.crossfade,
            kind,
        })
    }

    /// Requested duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
