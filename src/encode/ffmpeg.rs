use std::{
    ffi::OsString,
    fmt::Write as _,
    path::Path,
    process::{Command, Stdio},
};

use crate::{
    encode::job::{RenderInput, RenderJob},
    foundation::error::{ReelError, ReelResult},
};

/// Audio sample rate of the rendered reel.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

fn secs(v: f64) -> String {
    format!("{v:.3}")
}

/// Encoder worker count: available cores minus `reserved`, never below one.
pub fn worker_threads(reserved: usize) -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(reserved)
        .max(1)
}

/// Build the `-filter_complex` graph for `job`.
///
/// Each segment is scaled to its placement, padded onto a black canvas, resampled to the
/// output frame rate and cut to exactly its duration. Segments without audio get silence so
/// every concat input has one video and one audio stream.
pub fn filter_graph(job: &RenderJob) -> String {
    let mut graph = String::new();
    let canvas = job.canvas;
    let fps = job.opts.fps;

    for (i, input) in job.inputs.iter().enumerate() {
        let d = secs(input.duration);
        let p = input.placement;
        let _ = write!(
            graph,
            "[{i}:v]scale={}:{}:flags=lanczos,setsar=1,pad={}:{}:{}:{}:color=black,fps={fps},\
             tpad=stop_mode=clone:stop_duration={d},trim=duration={d},setpts=PTS-STARTPTS,\
             format=yuv420p[v{i}];",
            p.width, p.height, canvas.width, canvas.height, p.x, p.y,
        );
        if input.has_audio {
            let _ = write!(
                graph,
                "[{i}:a]aformat=sample_rates={MIX_SAMPLE_RATE}:channel_layouts=stereo,apad,\
                 atrim=duration={d},asetpts=PTS-STARTPTS[a{i}];",
            );
        } else {
            let _ = write!(
                graph,
                "anullsrc=r={MIX_SAMPLE_RATE}:cl=stereo,atrim=duration={d},\
                 asetpts=PTS-STARTPTS[a{i}];",
            );
        }
    }

    for i in 0..job.inputs.len() {
        let _ = write!(graph, "[v{i}][a{i}]");
    }
    let _ = write!(
        graph,
        "concat=n={}:v=1:a=1[outv][outa]",
        job.inputs.len()
    );
    graph
}

fn push_input(args: &mut Vec<OsString>, input: &RenderInput, fps: u32) {
    let d = secs(input.duration);
    if input.still {
        let fps = fps.to_string();
        args.extend(
            ["-loop", "1", "-framerate", fps.as_str(), "-t", d.as_str()]
                .into_iter()
                .map(OsString::from),
        );
    } else {
        let ss = secs(input.in_point);
        args.extend(
            ["-ss", ss.as_str(), "-t", d.as_str()]
                .into_iter()
                .map(OsString::from),
        );
    }
    args.push("-i".into());
    args.push(input.path.as_os_str().to_owned());
}

/// Full `ffmpeg` argument list for `job`.
pub fn render_args(job: &RenderJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    args.push(if job.opts.overwrite { "-y" } else { "-n" }.into());
    args.push("-loglevel".into());
    args.push("error".into());

    for input in &job.inputs {
        push_input(&mut args, input, job.opts.fps);
    }

    let fps = job.opts.fps.to_string();
    let threads = job.opts.threads.max(1).to_string();
    let rate = MIX_SAMPLE_RATE.to_string();
    args.push("-filter_complex".into());
    args.push(filter_graph(job).into());
    args.extend(
        [
            "-map",
            "[outv]",
            "-map",
            "[outa]",
            "-c:v",
            job.opts.video_codec.as_str(),
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            job.opts.audio_codec.as_str(),
            "-ar",
            rate.as_str(),
            "-r",
            fps.as_str(),
            "-threads",
            threads.as_str(),
            "-movflags",
            "+faststart",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(job.out_path.as_os_str().to_owned());
    args
}

fn validate(job: &RenderJob) -> ReelResult<()> {
    if job.inputs.is_empty() {
        return Err(ReelError::validation("render job has no inputs"));
    }
    if job.opts.fps == 0 {
        return Err(ReelError::validation("render fps must be non-zero"));
    }
    if !job.canvas.width.is_multiple_of(2) || !job.canvas.height.is_multiple_of(2) {
        return Err(ReelError::validation(
            "render width/height must be even (required for yuv420p mp4 output)",
        ));
    }
    Ok(())
}

/// Render `job` with the system `ffmpeg`. Blocks until the encoder exits.
pub fn run_render(job: &RenderJob) -> ReelResult<()> {
    validate(job)?;
    ensure_parent_dir(&job.out_path)?;
    if !job.opts.overwrite && job.out_path.exists() {
        return Err(ReelError::validation(format!(
            "output file '{}' already exists",
            job.out_path.display()
        )));
    }

    tracing::info!(
        out = %job.out_path.display(),
        segments = job.inputs.len(),
        duration = job.total_duration(),
        threads = job.opts.threads,
        "rendering reel"
    );
    let out = Command::new("ffmpeg")
        .args(render_args(job))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            ReelError::render(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

    if !out.status.success() {
        return Err(ReelError::render(format!(
            "ffmpeg exited with status {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}
