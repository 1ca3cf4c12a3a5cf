use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reelcut::{
    Canvas, FfmpegToolchain, ReelAssembler, ReelOutcome, ReelSettings, SkipReason,
    encode::ffmpeg::{is_ffmpeg_on_path, is_ffprobe_on_path},
};

#[derive(Parser, Debug)]
#[command(name = "reelcut", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a reel from a timeline config (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Write a starter timeline config for every supported file in a folder.
    Init(InitArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Timeline config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Directory the timeline's file names are resolved against.
    #[arg(long)]
    media_dir: PathBuf,

    /// Output MP4 path.
    #[arg(long, default_value = "test_output.mp4")]
    out: PathBuf,

    /// Maximum reel duration in seconds.
    #[arg(long, default_value_t = 90.0)]
    max_duration: f64,

    /// Output frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output width in pixels.
    #[arg(long, default_value_t = 1080)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 1920)]
    height: u32,

    /// Directory for constant-frame-rate conversions.
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Folder containing media files.
    #[arg(long)]
    folder: PathBuf,

    /// Where to write the generated config.
    #[arg(long)]
    out: PathBuf,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "reelcut=debug" } else { "reelcut=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Init(args) => cmd_init(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        is_ffmpeg_on_path() && is_ffprobe_on_path(),
        "ffmpeg and ffprobe are required on PATH"
    );

    let timeline = reelcut::load_timeline(&args.config)?;
    let mut settings = ReelSettings::default()
        .with_canvas(Canvas::new(args.width, args.height)?)
        .with_fps(args.fps)
        .with_max_duration(args.max_duration);
    if let Some(dir) = args.cache_dir {
        settings = settings.with_cache_dir(dir);
    }

    let assembler = ReelAssembler::new(settings, FfmpegToolchain);
    let outcome = assembler
        .run(&timeline, &args.media_dir, &args.out)
        .with_context(|| format!("render reel '{}'", args.out.display()))?;

    match outcome {
        ReelOutcome::Rendered(report) => {
            println!(
                "wrote {} ({} clips, {:.2}s)",
                report.output.display(),
                report.clips.len(),
                report.total_duration
            );
            for skipped in &report.skipped {
                match &skipped.reason {
                    SkipReason::Failed(err) => println!("  skipped {}: {err}", skipped.name),
                    SkipReason::OverBudget { clip_duration, .. } => println!(
                        "  skipped {}: {clip_duration:.2}s does not fit the budget",
                        skipped.name
                    ),
                }
            }
            Ok(())
        }
        ReelOutcome::NoClips { skipped } => {
            eprintln!("no valid clips produced ({} entries skipped)", skipped.len());
            std::process::exit(2);
        }
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    tracing::info!(folder = %args.folder.display(), "scanning folder");
    let timeline = reelcut::timeline_from_folder(&args.folder)?;
    reelcut::save_timeline(&timeline, &args.out)?;
    println!(
        "wrote {} ({} entries)",
        args.out.display(),
        timeline.len()
    );
    Ok(())
}
