use crate::{clip::handle::ClipHandle, foundation::core::Canvas};

/// Where a scaled clip sits on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Scaled width.
    pub width: u32,
    /// Scaled height.
    pub height: u32,
    /// Left offset of the scaled clip.
    pub x: u32,
    /// Top offset of the scaled clip.
    pub y: u32,
}

impl Placement {
    /// Fit a `src_w x src_h` frame inside `canvas`, preserving aspect ratio and centering it.
    ///
    /// Wider-than-canvas sources fill the width (bars top and bottom); all others fill the
    /// height (bars left and right). Scaled sides are truncated to integers.
    pub fn fit(src_w: u32, src_h: u32, canvas: Canvas) -> Self {
        let src_w = src_w.max(1);
        let src_h = src_h.max(1);
        let src_ar = f64::from(src_w) / f64::from(src_h);

        let (width, height) = if src_ar > canvas.aspect() {
            let h = (f64::from(canvas.width) / src_ar) as u32;
            (canvas.width, h.clamp(1, canvas.height))
        } else {
            let w = (f64::from(canvas.height) * src_ar) as u32;
            (w.clamp(1, canvas.width), canvas.height)
        };

        Self {
            width,
            height,
            x: (canvas.width - width) / 2,
            y: (canvas.height - height) / 2,
        }
    }
}

/// A clip scaled onto a black canvas, keeping its own audio track.
#[derive(Debug)]
pub struct LetterboxedClip {
    clip: ClipHandle,
    canvas: Canvas,
    placement: Placement,
}

impl LetterboxedClip {
    /// Output frame size; always the canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Scaled size and offset of the clip.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The wrapped clip.
    pub fn clip(&self) -> &ClipHandle {
        &self.clip
    }

    /// Duration of the composite (the clip's duration).
    pub fn duration(&self) -> f64 {
        self.clip.duration()
    }

    /// Audio comes only from the clip; the canvas is silent.
    pub fn has_audio(&self) -> bool {
        self.clip.has_audio()
    }

    /// Give the clip back for release.
    pub fn into_clip(self) -> ClipHandle {
        self.clip
    }
}

/// Letterbox `clip` onto `canvas`.
pub fn letterbox(clip: ClipHandle, canvas: Canvas) -> LetterboxedClip {
    let (w, h) = clip.size();
    let placement = Placement::fit(w, h, canvas);
    tracing::debug!(
        clip = clip.label(),
        src_w = w,
        src_h = h,
        scaled_w = placement.width,
        scaled_h = placement.height,
        "letterboxed clip"
    );
    LetterboxedClip {
        clip,
        canvas,
        placement,
    }
}
