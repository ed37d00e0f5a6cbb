use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{Font, Scale, point};
use std::fmt;
use std::path::Path;

/// Common system locations for a sans-serif TrueType font
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Pixel size of a glyph cell in the built-in bitmap font
const BITMAP_GLYPH: u32 = 8;

/// Font used for element labels and grid coordinates
///
/// Falls back to an embedded 8x8 bitmap font when no TrueType file is usable,
/// so rendering never depends on what is installed on the host.
#[derive(Clone)]
pub enum LabelFont {
    TrueType { font: Font<'static>, scale: Scale },
    Bitmap { scale: u32 },
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFont::TrueType { scale, .. } => write!(f, "LabelFont::TrueType({}px)", scale.y),
            LabelFont::Bitmap { scale } => write!(f, "LabelFont::Bitmap(x{})", scale),
        }
    }
}

impl LabelFont {
    /// Built-in bitmap font, each glyph `8 * scale` pixels square
    pub fn bitmap(scale: u32) -> Self {
        LabelFont::Bitmap { scale: scale.max(1) }
    }

    /// Use TrueType font data; `None` if the bytes are not a font
    pub fn from_bytes(bytes: Vec<u8>, size_px: f32) -> Option<Self> {
        let font = Font::try_from_vec(bytes)?;
        Some(LabelFont::TrueType {
            font,
            scale: Scale::uniform(size_px.max(1.0)),
        })
    }

    /// Load a TrueType font, trying `path` first and then [`FONT_CANDIDATES`]
    ///
    /// Any failure is logged and the bitmap font is returned instead.
    pub fn load(path: Option<&Path>, size_px: f32) -> Self {
        let candidates = path
            .into_iter()
            .chain(FONT_CANDIDATES.iter().map(Path::new));

        for candidate in candidates {
            match std::fs::read(candidate) {
                Ok(bytes) => match Self::from_bytes(bytes, size_px) {
                    Some(font) => {
                        log::debug!("Using label font {}", candidate.display());
                        return font;
                    }
                    None => log::debug!("{} is not a usable font", candidate.display()),
                },
                Err(e) => log::debug!("Font {} unavailable: {}", candidate.display(), e),
            }
        }

        let scale = ((size_px / BITMAP_GLYPH as f32).round() as u32).max(1);
        log::debug!("Falling back to built-in bitmap font at x{}", scale);
        Self::bitmap(scale)
    }

    /// Rendered size of `text` in pixels (width, height)
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            LabelFont::TrueType { font, scale } => {
                let v_metrics = font.v_metrics(*scale);
                let width = font
                    .layout(text, *scale, point(0.0, v_metrics.ascent))
                    .filter_map(|glyph| glyph.pixel_bounding_box().map(|bb| bb.max.x))
                    .max()
                    .unwrap_or(0)
                    .max(0) as u32;
                let height = (v_metrics.ascent - v_metrics.descent).ceil().max(0.0) as u32;
                (width, height)
            }
            LabelFont::Bitmap { scale } => {
                let glyph = BITMAP_GLYPH * scale;
                (text.chars().count() as u32 * glyph, glyph)
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y); pixels off-canvas are dropped
    pub fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>) {
        match self {
            LabelFont::TrueType { font, scale } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text);
            }
            LabelFont::Bitmap { scale } => draw_bitmap_text(canvas, x, y, text, color, *scale),
        }
    }
}

impl Default for LabelFont {
    fn default() -> Self {
        Self::bitmap(2)
    }
}

fn draw_bitmap_text(canvas: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>, scale: u32) {
    let scale = scale.max(1) as i32;
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let mut cursor_x = x;

    for ch in text.chars() {
        if let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) {
            for (row_idx, &row) in glyph.iter().enumerate() {
                for col_idx in 0..BITMAP_GLYPH as i32 {
                    if (row >> col_idx) & 1 == 0 {
                        continue;
                    }
                    let px = cursor_x + col_idx * scale;
                    let py = y + row_idx as i32 * scale;
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let (tx, ty) = (px + sx, py + sy);
                            if tx >= 0 && ty >= 0 && tx < width && ty < height {
                                canvas.put_pixel(tx as u32, ty as u32, color);
                            }
                        }
                    }
                }
            }
        }
        cursor_x += BITMAP_GLYPH as i32 * scale;
    }
}
