#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    io::Cursor,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use reelcut::{MediaToolchain, ProbeReport, Ratio, ReelError, ReelResult, RenderJob};
use tracing::{Event, Level, Subscriber, field::Field};
use tracing_subscriber::{
    Layer, Registry,
    layer::{Context, SubscriberExt as _},
};

/// Recording stand-in for `ffprobe`/`ffmpeg`.
#[derive(Default)]
pub struct FakeToolchain {
    reports: RefCell<HashMap<PathBuf, ProbeReport>>,
    pub probes: Cell<usize>,
    pub transcodes: RefCell<Vec<(PathBuf, PathBuf, u32)>>,
    pub renders: RefCell<Vec<RenderJob>>,
    /// Whether every still input existed on disk while rendering.
    pub stills_present_at_render: Cell<bool>,
    pub fail_transcode: Cell<bool>,
    pub fail_render: Cell<bool>,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, path: impl Into<PathBuf>, report: ProbeReport) {
        self.reports.borrow_mut().insert(path.into(), report);
    }

    pub fn transcode_count(&self) -> usize {
        self.transcodes.borrow().len()
    }

    pub fn render_count(&self) -> usize {
        self.renders.borrow().len()
    }

    pub fn last_render(&self) -> Option<RenderJob> {
        self.renders.borrow().last().cloned()
    }
}

impl MediaToolchain for FakeToolchain {
    fn probe(&self, path: &Path) -> ReelResult<ProbeReport> {
        self.probes.set(self.probes.get() + 1);
        self.reports
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| ReelError::probe(format!("no fake report for '{}'", path.display())))
    }

    fn transcode_cfr(&self, source: &Path, dst: &Path, fps: u32) -> ReelResult<()> {
        self.transcodes
            .borrow_mut()
            .push((source.to_path_buf(), dst.to_path_buf(), fps));
        if self.fail_transcode.get() {
            std::fs::write(dst, b"partial")?;
            return Err(ReelError::transcode("fake ffmpeg exited with status 1"));
        }
        std::fs::write(dst, b"cfr")?;

        let converted = self.reports.borrow().get(source).cloned().map(|r| {
            let rate = Ratio::new(fps, 1);
            ProbeReport {
                r_frame_rate: rate,
                avg_frame_rate: rate,
                ..r
            }
        });
        if let Some(report) = converted {
            self.register(dst, report);
        }
        Ok(())
    }

    fn render(&self, job: &RenderJob) -> ReelResult<()> {
        self.stills_present_at_render.set(
            job.inputs
                .iter()
                .filter(|i| i.still)
                .all(|i| i.path.exists()),
        );
        self.renders.borrow_mut().push(job.clone());
        if self.fail_render.get() {
            return Err(ReelError::render("fake ffmpeg could not open output"));
        }
        std::fs::write(&job.out_path, b"mp4")?;
        Ok(())
    }
}

/// Constant-rate video report.
pub fn video(width: u32, height: u32, duration_sec: f64, has_audio: bool) -> ProbeReport {
    ProbeReport {
        width,
        height,
        duration_sec: Some(duration_sec),
        has_audio,
        r_frame_rate: Ratio::new(30, 1),
        avg_frame_rate: Ratio::new(30, 1),
    }
}

/// Variable-rate video report (nominal 30/1, average ~29.97).
pub fn vfr_video(width: u32, height: u32, duration_sec: f64) -> ProbeReport {
    ProbeReport {
        r_frame_rate: Ratio::new(30, 1),
        avg_frame_rate: Ratio::new(5_394_000, 180_001),
        ..video(width, height, duration_sec, true)
    }
}

/// Create an empty placeholder media file.
pub fn touch(path: &Path) {
    std::fs::write(path, b"").unwrap();
}

/// Write a solid-color PNG.
pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([180, 90, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

/// Log events recorded by [`capture_logs`], as `(level, message)`.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedLogs {
    /// Number of events at `level` whose message is exactly `message`.
    pub fn count(&self, level: Level, message: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, m)| *l == level && m == message)
            .count()
    }
}

struct CaptureLayer(CapturedLogs);

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0
            .0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

/// Run `f` with a subscriber that records every event emitted on this thread.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = Registry::default().with(CaptureLayer(logs.clone()));
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs)
}
