use std::{
    collections::HashMap,
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{
    foundation::error::{ReelError, ReelResult},
    toolchain::MediaToolchain,
};

/// x264 preset used for constant-frame-rate conversion.
pub const CFR_PRESET: &str = "veryfast";
/// x264 CRF used for constant-frame-rate conversion.
pub const CFR_CRF: u8 = 18;
/// Audio bitrate used for constant-frame-rate conversion.
pub const CFR_AUDIO_BITRATE: &str = "192k";

/// Run-scoped cache of constant-frame-rate conversions.
///
/// Keys are the original path strings. Every file this cache creates is tracked and removed
/// by [`CfrCache::purge`], which the assembler calls at the start and at the end of a run.
/// Reusing one cache across runs requires `&mut` access, so runs sharing it cannot overlap.
#[derive(Debug)]
pub struct CfrCache {
    cache_dir: PathBuf,
    converted: HashMap<String, PathBuf>,
    temp_files: Vec<PathBuf>,
}

impl CfrCache {
    /// Create an empty cache that writes conversions into `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            converted: HashMap::new(),
            temp_files: Vec::new(),
        }
    }

    /// Directory conversions are written to.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Deterministic on-disk location of the conversion of `source` at `fps`.
    ///
    /// Named after the full file name, extension included, so `clip.mp4` and `clip.mov` never
    /// share a conversion.
    pub fn cache_path(&self, source: &Path, fps: u32) -> PathBuf {
        let base = source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip".to_string());
        self.cache_dir.join(format!("{base}_cfr_{fps}fps.mp4"))
    }

    /// Files created by this cache that have not been purged yet.
    pub fn temp_files(&self) -> &[PathBuf] {
        &self.temp_files
    }

    /// Number of cached source paths.
    pub fn len(&self) -> usize {
        self.converted.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.converted.is_empty()
    }

    /// Return a constant-frame-rate version of `source` at `fps`.
    ///
    /// A path seen earlier in this run is answered from memory. Otherwise an existing file at
    /// [`CfrCache::cache_path`] is reused as-is; only when neither exists is the transcoder
    /// invoked. Transcoder failures propagate.
    pub fn normalize(
        &mut self,
        tools: &dyn MediaToolchain,
        source: &Path,
        fps: u32,
    ) -> ReelResult<PathBuf> {
        if fps == 0 {
            return Err(ReelError::validation("cfr target fps must be non-zero"));
        }

        let key = source.to_string_lossy().into_owned();
        if let Some(done) = self.converted.get(&key) {
            tracing::debug!(source = %key, cached = %done.display(), "cfr cache hit");
            return Ok(done.clone());
        }

        let dst = self.cache_path(source, fps);
        if dst.exists() {
            tracing::info!(
                source = %key,
                cached = %dst.display(),
                "reusing existing cfr conversion"
            );
            self.converted.insert(key, dst.clone());
            return Ok(dst);
        }

        std::fs::create_dir_all(&self.cache_dir)?;
        tracing::info!(source = %key, fps, out = %dst.display(), "converting to constant frame rate");
        if let Err(e) = tools.transcode_cfr(source, &dst, fps) {
            if dst.exists()
                && let Err(rm) = std::fs::remove_file(&dst)
            {
                tracing::warn!(path = %dst.display(), error = %rm, "failed to remove partial cfr output");
            }
            return Err(e);
        }

        self.temp_files.push(dst.clone());
        self.converted.insert(key, dst.clone());
        Ok(dst)
    }

    /// Remove every tracked conversion from disk and forget all cached paths.
    ///
    /// Removal failures are logged and swallowed. Returns the number of files removed.
    pub fn purge(&mut self) -> usize {
        let mut removed = 0;
        for path in self.temp_files.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "removed cfr temp file");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove cfr temp file");
                }
            }
        }
        self.converted.clear();
        removed
    }
}

/// Arguments for converting `source` into a constant-frame-rate MP4 at `dst`.
pub fn cfr_transcode_args(source: &Path, dst: &Path, fps: u32) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-loglevel", "error", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(source.as_os_str().to_owned());
    let fps = fps.to_string();
    let crf = CFR_CRF.to_string();
    args.extend(
        [
            "-fps_mode",
            "cfr",
            "-r",
            fps.as_str(),
            "-c:v",
            "libx264",
            "-preset",
            CFR_PRESET,
            "-crf",
            crf.as_str(),
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
            "-b:a",
            CFR_AUDIO_BITRATE,
            "-movflags",
            "+faststart",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(dst.as_os_str().to_owned());
    args
}

/// Run the system `ffmpeg` to convert `source` to constant frame rate. Blocks until done.
pub fn run_cfr_transcode(source: &Path, dst: &Path, fps: u32) -> ReelResult<()> {
    let out = Command::new("ffmpeg")
        .args(cfr_transcode_args(source, dst, fps))
        .output()
        .map_err(|e| {
            ReelError::transcode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
    if !out.status.success() {
        return Err(ReelError::transcode(format!(
            "ffmpeg cfr conversion of '{}' exited with status {}: {}",
            source.display(),
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(())
}
