use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context as _;
use indexmap::IndexMap;
use serde::Serialize as _;

use crate::{
    foundation::error::{ReelError, ReelResult},
    timeline::model::{PHOTO_TYPE, RawEntry, Timeline, VIDEO_TYPE},
};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

/// Load and validate a timeline JSON file, preserving entry order.
///
/// Every entry must be an object with `start`, `end`, `crossfade` (or `transition`) and a
/// `type` of `"video"` or `"photo"`.
pub fn load_timeline(path: &Path) -> ReelResult<Timeline> {
    let f = File::open(path).with_context(|| format!("open timeline '{}'", path.display()))?;
    let doc: IndexMap<String, serde_json::Value> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse timeline JSON '{}'", path.display()))?;
    tracing::info!(path = %path.display(), entries = doc.len(), "loaded timeline file");

    let timeline = parse_entries(doc)?;
    tracing::info!("timeline structure is valid");
    Ok(timeline)
}

/// Parse a timeline from an in-memory JSON string.
pub fn parse_timeline(json: &str) -> ReelResult<Timeline> {
    let doc: IndexMap<String, serde_json::Value> = serde_json::from_str(json)?;
    parse_entries(doc)
}

fn parse_entries(doc: IndexMap<String, serde_json::Value>) -> ReelResult<Timeline> {
    let mut timeline = Timeline::with_capacity(doc.len());
    for (name, value) in doc {
        let Some(obj) = value.as_object() else {
            return Err(ReelError::validation(format!(
                "entry for '{name}' is not an object"
            )));
        };

        let mut missing: Vec<&str> = ["start", "end", "type"]
            .into_iter()
            .filter(|k| !obj.contains_key(*k))
            .collect();
        if !obj.contains_key("crossfade") && !obj.contains_key("transition") {
            missing.push("crossfade");
        }
        if !missing.is_empty() {
            return Err(ReelError::validation(format!(
                "missing keys in '{name}': {}",
                missing.join(", ")
            )));
        }

        match obj.get("type").and_then(|t| t.as_str()) {
            Some(VIDEO_TYPE | PHOTO_TYPE) => {}
            other => {
                return Err(ReelError::validation(format!(
                    "invalid type in '{name}': {}",
                    other.map_or_else(|| obj["type"].to_string(), str::to_string)
                )));
            }
        }

        let entry: RawEntry = serde_json::from_value(value)
            .map_err(|e| ReelError::validation(format!("invalid entry '{name}': {e}")))?;
        timeline.insert(name, entry);
    }
    Ok(timeline)
}

/// Write a timeline as pretty JSON (4-space indent), preserving order.
pub fn save_timeline(timeline: &Timeline, path: &Path) -> ReelResult<()> {
    let f = File::create(path).with_context(|| format!("create timeline '{}'", path.display()))?;
    let mut w = BufWriter::new(f);
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut w, fmt);
    timeline.serialize(&mut ser)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}

/// Guess the timeline type of a media file from its extension.
pub fn detect_kind(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(VIDEO_TYPE)
    } else if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        Some(PHOTO_TYPE)
    } else {
        None
    }
}

/// Build a starter timeline with one default entry per supported file in `dir`.
///
/// Entries are ordered by file name and default to `0..10` s with a 1 s crossfade.
pub fn timeline_from_folder(dir: &Path) -> ReelResult<Timeline> {
    let mut names = Vec::new();
    for dirent in std::fs::read_dir(dir)
        .with_context(|| format!("read media folder '{}'", dir.display()))?
    {
        let dirent = dirent?;
        if !dirent.file_type()?.is_file() {
            continue;
        }
        names.push(dirent.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let mut timeline = Timeline::new();
    for name in names {
        match detect_kind(&name) {
            Some(kind) => {
                timeline.insert(
                    name,
                    RawEntry {
                        start: 0.0,
                        end: 10.0,
                        crossfade: 1.0,
                        kind: kind.to_string(),
                        video_resampling: 0,
                    },
                );
            }
            None => tracing::warn!(file = %name, "skipped unsupported file type"),
        }
    }
    Ok(timeline)
}
