//! Seam between the pipeline and the external media tools.

use std::path::Path;

use crate::{
    encode::{ffmpeg::run_render, job::RenderJob},
    foundation::error::ReelResult,
    media::{cfr::run_cfr_transcode, probe::ProbeReport, probe::run_ffprobe},
};

/// External probing, transcoding and rendering steps.
///
/// Every call blocks until the tool exits.
pub trait MediaToolchain {
    /// Describe a media file.
    fn probe(&self, path: &Path) -> ReelResult<ProbeReport>;

    /// Write a constant-frame-rate copy of `source` to `dst`.
    fn transcode_cfr(&self, source: &Path, dst: &Path, fps: u32) -> ReelResult<()>;

    /// Render the final reel.
    fn render(&self, job: &RenderJob) -> ReelResult<()>;
}

/// [`MediaToolchain`] backed by the system `ffprobe` and `ffmpeg` binaries.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegToolchain;

impl MediaToolchain for FfmpegToolchain {
    fn probe(&self, path: &Path) -> ReelResult<ProbeReport> {
        run_ffprobe(path)
    }

    fn transcode_cfr(&self, source: &Path, dst: &Path, fps: u32) -> ReelResult<()> {
        run_cfr_transcode(source, dst, fps)
    }

    fn render(&self, job: &RenderJob) -> ReelResult<()> {
        run_render(job)
    }
}

impl<T: MediaToolchain + ?Sized> MediaToolchain for &T {
    fn probe(&self, path: &Path) -> ReelResult<ProbeReport> {
        (**self).probe(path)
    }

    fn transcode_cfr(&self, source: &Path, dst: &Path, fps: u32) -> ReelResult<()> {
        (**self).transcode_cfr(source, dst, fps)
    }

    fn render(&self, job: &RenderJob) -> ReelResult<()> {
        (**self).render(job)
    }
}
