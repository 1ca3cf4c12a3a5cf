use std::{
    io::{BufWriter, Write as _},
    path::Path,
};

use image::{
    DynamicImage, ImageError, ImageFormat, ImageReader, RgbaImage, imageops, imageops::FilterType,
};
use tempfile::TempPath;

use crate::foundation::{
    core::Canvas,
    error::{ReelError, ReelResult},
};

/// Background is blurred at `1/BG_DOWNSCALE` of the canvas size, then stretched back.
const BG_DOWNSCALE: u32 = 8;
/// Gaussian sigma applied to the downscaled background.
const BG_BLUR_SIGMA: f32 = 3.0;
/// Brightness multiplier for the background (`0..=1`).
const BG_DARKEN: f32 = 0.5;

/// Decode a photo from disk. The format is sniffed from content, not just the extension.
pub fn load_photo(path: &Path) -> ReelResult<DynamicImage> {
    ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(ImageError::IoError)
        .and_then(ImageReader::decode)
        .map_err(|e| ReelError::decode(format!("failed to decode photo '{}': {e}", path.display())))
}

/// Largest size with the same aspect ratio as `(w, h)` that fits inside the canvas.
///
/// Never upscales; sides are at least one pixel.
pub fn fit_within(w: u32, h: u32, canvas: Canvas) -> (u32, u32) {
    if w <= canvas.width && h <= canvas.height {
        return (w.max(1), h.max(1));
    }
    let scale = f64::min(
        f64::from(canvas.width) / f64::from(w),
        f64::from(canvas.height) / f64::from(h),
    );
    let fw = ((f64::from(w) * scale).round() as u32).clamp(1, canvas.width);
    let fh = ((f64::from(h) * scale).round() as u32).clamp(1, canvas.height);
    (fw, fh)
}

/// Compose a photo onto a vertical canvas.
///
/// The photo is Lanczos-downscaled to fit and centered over a blurred, darkened copy of
/// itself stretched to fill the whole canvas. The result is fully opaque.
pub fn compose_vertical(photo: &DynamicImage, canvas: Canvas) -> RgbaImage {
    let rgba = photo.to_rgba8();
    let (w, h) = rgba.dimensions();

    let mut bg = blurred_background(&rgba, canvas);

    let (fw, fh) = fit_within(w, h, canvas);
    let fg = if (fw, fh) == (w, h) {
        rgba
    } else {
        imageops::resize(&rgba, fw, fh, FilterType::Lanczos3)
    };

    let x = (canvas.width - fw) / 2;
    let y = (canvas.height - fh) / 2;
    imageops::overlay(&mut bg, &fg, i64::from(x), i64::from(y));
    for px in bg.pixels_mut() {
        px.0[3] = 255;
    }
    bg
}

fn blurred_background(src: &RgbaImage, canvas: Canvas) -> RgbaImage {
    let small_w = (canvas.width / BG_DOWNSCALE).max(1);
    let small_h = (canvas.height / BG_DOWNSCALE).max(1);
    let small = imageops::resize(src, small_w, small_h, FilterType::Triangle);
    let mut small = imageops::blur(&small, BG_BLUR_SIGMA);
    for px in small.pixels_mut() {
        for c in &mut px.0[..3] {
            *c = (f32::from(*c) * BG_DARKEN).round() as u8;
        }
        px.0[3] = 255;
    }
    imageops::resize(&small, canvas.width, canvas.height, FilterType::Triangle)
}

/// Write a composed frame as a PNG temp file inside `dir`.
pub fn write_still(frame: &RgbaImage, dir: &Path) -> ReelResult<TempPath> {
    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::Builder::new()
        .prefix("reelcut-still-")
        .suffix(".png")
        .tempfile_in(dir)?;
    {
        let mut w = BufWriter::new(file.as_file_mut());
        frame.write_to(&mut w, ImageFormat::Png)?;
        w.flush()?;
    }
    Ok(file.into_temp_path())
}
