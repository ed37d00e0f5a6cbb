//! Screenshot overlays
//!
//! - Annotator: outlines each indexed element and labels it `"{index}: {name}"`
//! - GridRenderer: coordinate grid and side-by-side comparison images
//! - LabelFont: TrueType label font with a built-in bitmap fallback
//! - ColorSource: seedable per-element colors

pub mod annotate;
pub mod font;
pub mod grid;
pub mod palette;

pub use annotate::{AnnotatedImage, Annotator, LabelBox, RenderOutcome, place_label};
pub use font::LabelFont;
pub use grid::{GridOverlay, GridRenderer, grid_positions};
pub use palette::ColorSource;

use crate::error::Result;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

/// Decode PNG/JPEG/... screenshot bytes into an RGBA buffer
pub fn decode_screenshot(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Encode an RGBA buffer as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(buf)
}
