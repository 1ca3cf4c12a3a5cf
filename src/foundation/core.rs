use crate::foundation::error::{ReelError, ReelResult};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Default portrait reel resolution.
    pub const PORTRAIT_1080: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Create a validated canvas.
    ///
    /// Both sides must be non-zero and even (`yuv420p` output requires even dimensions).
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::PORTRAIT_1080
    }
}

/// Non-negative rational number as reported by `ffprobe` (`"30000/1001"`).
#[derive(Clone, Copy, Debug)]
pub struct Ratio {
    /// Numerator.
    pub num: u32,
    /// Denominator, never zero.
    pub den: u32,
}

impl Ratio {
    /// Create a ratio, rejecting a zero denominator.
    pub fn new(num: u32, den: u32) -> Option<Self> {
        if den == 0 {
            return None;
        }
        Some(Self { num, den })
    }

    /// Parse `num/den` text. A bare integer is read as `num/1`.
    ///
    /// Only digits are accepted; nothing is evaluated.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.split_once('/') {
            Some((num, den)) => Self::new(num.trim().parse().ok()?, den.trim().parse().ok()?),
            None => Self::new(s.parse().ok()?, 1),
        }
    }

    /// Integer part (floor for non-negative ratios).
    pub fn floor(self) -> u32 {
        self.num / self.den
    }

    /// Floating-point value.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

// Exact rational equality: 60/2 == 30/1, 30000/1001 != 2997/100.
impl PartialEq for Ratio {
    fn eq(&self, other: &Self) -> bool {
        u64::from(self.num) * u64::from(other.den) == u64::from(other.num) * u64::from(self.den)
    }
}

impl Eq for Ratio {}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_zero_and_odd() {
        assert!(Canvas::new(0, 1920).is_err());
        assert!(Canvas::new(1081, 1920).is_err());
        assert_eq!(Canvas::new(1080, 1920).unwrap(), Canvas::PORTRAIT_1080);
    }

    #[test]
    fn ratio_parse_and_floor() {
        let r = Ratio::parse("30000/1001").unwrap();
        assert_eq!(r.floor(), 29);
        assert_eq!(Ratio::parse("25").unwrap().floor(), 25);
        assert!(Ratio::parse("0/0").is_none());
        assert!(Ratio::parse("30*2/1").is_none());
        assert!(Ratio::parse("").is_none());
    }

    #[test]
    fn ratio_equality_is_exact_and_rational() {
        assert_eq!(Ratio::parse("60/2"), Ratio::parse("30/1"));
        assert_ne!(Ratio::parse("30000/1001"), Ratio::parse("2997/100"));
        assert_ne!(Ratio::parse("30/1"), Ratio::parse("2999/100"));
    }
}
