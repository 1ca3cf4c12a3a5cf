use std::path::Path;

use crate::{
    foundation::{
        core::Ratio,
        error::{ReelError, ReelResult},
    },
    toolchain::MediaToolchain,
};

/// What `ffprobe` reports about a media file.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeReport {
    /// Width of the first video stream.
    pub width: u32,
    /// Height of the first video stream.
    pub height: u32,
    /// Container duration in seconds (falls back to the video stream duration). `None` when
    /// neither is reported.
    pub duration_sec: Option<f64>,
    /// Whether any audio stream is present.
    pub has_audio: bool,
    /// Nominal frame rate (`r_frame_rate`).
    pub r_frame_rate: Option<Ratio>,
    /// Time-average frame rate (`avg_frame_rate`).
    pub avg_frame_rate: Option<Ratio>,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Parse `ffprobe -print_format json -show_streams -show_format` output.
pub fn parse_ffprobe_json(bytes: &[u8]) -> ReelResult<ProbeReport> {
    let parsed: ProbeOut = serde_json::from_slice(bytes)
        .map_err(|e| ReelError::probe(format!("ffprobe json parse failed: {e}")))?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ReelError::probe("no video stream found"))?;
    let width = video
        .width
        .ok_or_else(|| ReelError::probe("missing video width from ffprobe"))?;
    let height = video
        .height
        .ok_or_else(|| ReelError::probe("missing video height from ffprobe"))?;

    let seconds = |s: Option<&str>| {
        s.and_then(|s| s.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
    };
    let duration_sec = seconds(parsed.format.as_ref().and_then(|f| f.duration.as_deref()))
        .or_else(|| seconds(video.duration.as_deref()));

    Ok(ProbeReport {
        width,
        height,
        duration_sec,
        has_audio: parsed
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some("audio")),
        r_frame_rate: video.r_frame_rate.as_deref().and_then(Ratio::parse),
        avg_frame_rate: video.avg_frame_rate.as_deref().and_then(Ratio::parse),
    })
}

/// Run the system `ffprobe` against `path`.
pub fn run_ffprobe(path: &Path) -> ReelResult<ProbeReport> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| ReelError::probe(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::probe(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_ffprobe_json(&out.stdout)
}

/// Frame-rate verdict for one video file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRateProbe {
    /// Nominal rate differs from the time-average rate.
    pub is_variable: bool,
    /// Time-average rate, floor-rounded. `None` when probing failed.
    pub average_fps: Option<u32>,
}

impl FrameRateProbe {
    /// Verdict used when the file could not be probed: treat it as constant rate.
    pub const UNKNOWN: FrameRateProbe = FrameRateProbe {
        is_variable: false,
        average_fps: None,
    };

    /// Derive the verdict from both reported rates.
    ///
    /// Equality is exact rational equality; rates that differ only in the last digit still
    /// count as variable.
    pub fn from_rates(nominal: Ratio, average: Ratio) -> Self {
        Self {
            is_variable: nominal != average,
            average_fps: Some(average.floor()),
        }
    }
}

/// Probe `path` and decide whether it has variable frame rate.
///
/// Never fails: any probe problem is logged and reported as [`FrameRateProbe::UNKNOWN`].
pub fn probe_frame_rate(tools: &dyn MediaToolchain, path: &Path) -> FrameRateProbe {
    let report = match tools.probe(path) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "frame-rate probe failed");
            return FrameRateProbe::UNKNOWN;
        }
    };

    match (report.r_frame_rate, report.avg_frame_rate) {
        (Some(nominal), Some(average)) => {
            let verdict = FrameRateProbe::from_rates(nominal, average);
            tracing::debug!(
                path = %path.display(),
                %nominal,
                %average,
                is_variable = verdict.is_variable,
                "probed frame rate"
            );
            verdict
        }
        _ => {
            tracing::warn!(
                path = %path.display(),
                "frame-rate probe returned no usable r_frame_rate/avg_frame_rate"
            );
            FrameRateProbe::UNKNOWN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE_JSON: &str = r#"{
        "streams": [
            {"codec_type": "video", "width": 1920, "height": 1080,
             "r_frame_rate": "30/1", "avg_frame_rate": "5394000/180001", "duration": "9.5"},
            {"codec_type": "audio"}
        ],
        "format": {"duration": "10.000000"}
    }"#;

    #[test]
    fn parses_dimensions_duration_audio_and_rates() {
        let r = parse_ffprobe_json(PROBE_JSON.as_bytes()).unwrap();
        assert_eq!((r.width, r.height), (1920, 1080));
        assert_eq!(r.duration_sec, Some(10.0));
        assert!(r.has_audio);
        assert_eq!(r.r_frame_rate, Ratio::new(30, 1));
        assert_eq!(r.avg_frame_rate.unwrap().floor(), 29);
    }

    #[test]
    fn falls_back_to_stream_duration_and_handles_zero_rate() {
        let json = r#"{"streams": [{"codec_type": "video", "width": 8, "height": 8,
            "r_frame_rate": "25/1", "avg_frame_rate": "0/0", "duration": "2.5"}]}"#;
        let r = parse_ffprobe_json(json.as_bytes()).unwrap();
        assert_eq!(r.duration_sec, Some(2.5));
        assert!(!r.has_audio);
        assert!(r.avg_frame_rate.is_none());
    }

    #[test]
    fn unreported_duration_stays_unknown() {
        let json = r#"{"streams": [{"codec_type": "video", "width": 8, "height": 8,
            "r_frame_rate": "25/1", "avg_frame_rate": "25/1", "duration": "N/A"}],
            "format": {}}"#;
        let r = parse_ffprobe_json(json.as_bytes()).unwrap();
        assert_eq!(r.duration_sec, None);
    }

    #[test]
    fn missing_video_stream_is_an_error() {
        let json = r#"{"streams": [{"codec_type": "audio"}], "format": {}}"#;
        assert!(parse_ffprobe_json(json.as_bytes()).is_err());
        assert!(parse_ffprobe_json(b"not json").is_err());
    }

    #[test]
    fn verdict_uses_exact_rational_comparison() {
        let v = FrameRateProbe::from_rates(Ratio::new(30, 1).unwrap(), Ratio::new(60, 2).unwrap());
        assert_eq!(
            v,
            FrameRateProbe {
                is_variable: false,
                average_fps: Some(30)
            }
        );

        let v = FrameRateProbe::from_rates(
            Ratio::new(30, 1).unwrap(),
            Ratio::new(5394000, 180001).unwrap(),
        );
        assert!(v.is_variable);
        assert_eq!(v.average_fps, Some(29));
    }
}
