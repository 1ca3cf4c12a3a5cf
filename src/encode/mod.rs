//! Final reel rendering.
//!
//! A [`job::RenderJob`] lists letterboxed segments in order; [`ffmpeg`] turns it into a single
//! `ffmpeg` invocation that concatenates them into an MP4.

/// `ffmpeg` command construction and execution.
pub mod ffmpeg;
/// Render job description.
pub mod job;
