use std::path::{Path, PathBuf};

use crate::{
    clip::{
        handle::{Clamp, ClipHandle},
        photo::{compose_vertical, load_photo, write_still},
    },
    foundation::{
        core::Canvas,
        error::{ReelError, ReelResult},
    },
    media::{cfr::CfrCache, probe::probe_frame_rate},
    timeline::model::{MediaEntry, MediaKind},
    toolchain::MediaToolchain,
};

/// Turns timeline entries into clips of exactly the requested duration.
pub struct EntryProcessor<'a> {
    tools: &'a dyn MediaToolchain,
    media_root: &'a Path,
    still_dir: &'a Path,
    canvas: Canvas,
}

impl<'a> EntryProcessor<'a> {
    /// Resolve entries against `media_root`; composed photo frames go to `still_dir`.
    pub fn new(
        tools: &'a dyn MediaToolchain,
        media_root: &'a Path,
        still_dir: &'a Path,
        canvas: Canvas,
    ) -> Self {
        Self {
            tools,
            media_root,
            still_dir,
            canvas,
        }
    }

    /// Build the clip for `entry`. Any error concerns this entry only.
    #[tracing::instrument(skip_all, fields(entry = %entry.name))]
    pub fn process(&self, cfr: &mut CfrCache, entry: &MediaEntry) -> ReelResult<ClipHandle> {
        let path = self.media_root.join(&entry.name);
        if !path.is_file() {
            return Err(ReelError::decode(format!(
                "media file not found: '{}'",
                path.display()
            )));
        }

        match entry.kind {
            MediaKind::Video { resample } => self.video(cfr, entry, path, resample),
            MediaKind::Photo => self.photo(entry, &path),
        }
    }

    fn video(
        &self,
        cfr: &mut CfrCache,
        entry: &MediaEntry,
        path: PathBuf,
        resample: bool,
    ) -> ReelResult<ClipHandle> {
        let rate = probe_frame_rate(self.tools, &path);
        let source = match (rate.is_variable, resample, rate.average_fps) {
            (true, true, Some(fps)) if fps > 0 => cfr.normalize(self.tools, &path, fps)?,
            (true, true, _) => {
                tracing::warn!("variable frame rate without a usable average; using original");
                path
            }
            (true, false, _) => {
                tracing::info!("variable frame rate source, resampling disabled");
                path
            }
            (false, ..) => path,
        };

        let info = self.tools.probe(&source).map_err(|e| {
            ReelError::decode(format!("failed to open video '{}': {e}", source.display()))
        })?;
        if info.width == 0 || info.height == 0 {
            return Err(ReelError::decode(format!(
                "video '{}' reports a zero frame size",
                source.display()
            )));
        }

        let mut end = entry.end;
        let mut clamp = None;
        match info.duration_sec {
            Some(duration) if end > duration => {
                tracing::warn!(
                    requested_end = end,
                    duration,
                    "requested end exceeds media duration; clamping"
                );
                clamp = Some(Clamp {
                    requested_end: end,
                    actual_end: duration,
                });
                end = duration;
            }
            Some(_) => {}
            None => tracing::debug!(
                requested_end = end,
                "media duration unknown; using requested end"
            ),
        }
        if entry.start >= end {
            return Err(ReelError::decode(format!(
                "trim window [{}, {end}] is empty for '{}'",
                entry.start, entry.name
            )));
        }

        let clip = ClipHandle::video(
            entry.name.as_str(),
            source,
            entry.start,
            end - entry.start,
            (info.width, info.height),
            info.has_audio,
        );
        Ok(match clamp {
            Some(c) => clip.with_clamp(c),
            None => clip,
        })
    }

    fn photo(&self, entry: &MediaEntry, path: &Path) -> ReelResult<ClipHandle> {
        let photo = load_photo(path)?;
        let frame = compose_vertical(&photo, self.canvas);
        let still = write_still(&frame, self.still_dir)?;
        tracing::debug!(still = %still.display(), "composed photo frame");
        Ok(ClipHandle::still(
            entry.name.as_str(),
            still,
            entry.duration(),
            (self.canvas.width, self.canvas.height),
        ))
    }
}
