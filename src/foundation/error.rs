/// Result alias used across the crate.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error type for timeline loading, per-entry processing and rendering.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid timeline data or settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// `ffprobe` could not describe a media file.
    #[error("probe error: {0}")]
    Probe(String),

    /// Constant-frame-rate conversion failed.
    #[error("transcode error: {0}")]
    Transcode(String),

    /// A photo or video could not be decoded into a clip.
    #[error("decode error: {0}")]
    Decode(String),

    /// The final render could not be produced.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Image codec error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else, with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Probe`].
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Build a [`ReelError::Transcode`].
    pub fn transcode(msg: impl Into<String>) -> Self {
        Self::Transcode(msg.into())
    }

    /// Build a [`ReelError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ReelError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ReelError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(ReelError::probe("x").to_string().contains("probe error:"));
        assert!(
            ReelError::transcode("x")
                .to_string()
                .contains("transcode error:")
        );
        assert!(ReelError::decode("x").to_string().contains("decode error:"));
        assert!(ReelError::render("x").to_string().contains("render error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ReelError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
