//! Coordinate grid overlays.
//!
//! Independent of any hierarchy data: a grid is drawn straight onto the
//! screenshot so coordinates can be read off by eye when no element matches.

use crate::error::{PuppeteerError, Result};
use crate::render::font::LabelFont;
use crate::render::{decode_screenshot, encode_png};
use image::imageops;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

pub const GRID_LINE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const COORD_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const COORD_TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Distance of a coordinate label from its intersection
const COORD_OFFSET: i32 = 2;
const COORD_PADDING: u32 = 1;

/// Title row padding on the comparison canvas
const HEADER_PADDING: u32 = 8;

/// Line positions from 0 up to and including `extent`, every `cell_size` pixels
pub fn grid_positions(extent: u32, cell_size: u32) -> Vec<u32> {
    if cell_size == 0 {
        return Vec::new();
    }
    (0..=extent).step_by(cell_size as usize).collect()
}

/// Text drawn at a grid intersection
pub fn coordinate_label(x: u32, y: u32) -> String {
    format!("{},{}", x, y)
}

/// Top-left corner of the label for intersection `(x, y)`
///
/// Labels sit below and to the right of their intersection. One that would run
/// off the right or bottom edge moves to the other side of that edge's line.
/// A label moved left also steps one label height further from its row so it
/// clears the label of the previous intersection.
fn place_coordinate(x: u32, y: u32, label_w: u32, label_h: u32, width: u32, height: u32) -> (i32, i32) {
    let (x, y) = (x as i64, y as i64);
    let (label_w, label_h) = (label_w as i64, label_h as i64);
    let offset = COORD_OFFSET as i64;

    let flip_x = x + offset + label_w > width as i64;
    let flip_y = y + offset + label_h > height as i64;

    let lx = if flip_x { x - offset - label_w } else { x + offset };
    let mut ly = if flip_y { y - offset - label_h } else { y + offset };
    if flip_x {
        let step = label_h + offset;
        ly = if flip_y { ly - step } else { ly + step };
    }

    let max_x = (width as i64 - label_w).max(0);
    let max_y = (height as i64 - label_h).max(0);
    (lx.clamp(0, max_x) as i32, ly.clamp(0, max_y) as i32)
}

/// A screenshot with a coordinate grid drawn over it
#[derive(Debug, Clone)]
pub struct GridOverlay {
    pub image: RgbaImage,
    /// x positions of vertical lines
    pub vertical: Vec<u32>,
    /// y positions of horizontal lines
    pub horizontal: Vec<u32>,
}

impl GridOverlay {
    /// Every labelled intersection, row by row
    pub fn intersections(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.horizontal
            .iter()
            .flat_map(move |&y| self.vertical.iter().map(move |&x| (x, y)))
    }

    /// Label texts in drawing order
    pub fn coordinate_labels(&self) -> Vec<String> {
        self.intersections().map(|(x, y)| coordinate_label(x, y)).collect()
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }
}

/// Renders coordinate grids and side-by-side comparisons
#[derive(Debug, Clone)]
pub struct GridRenderer {
    font: LabelFont,
    gap: u32,
}

impl GridRenderer {
    /// Create a renderer with a 20px gap between comparison panels
    pub fn new(font: LabelFont) -> Self {
        Self { font, gap: 20 }
    }

    /// Builder method: set the space between the two comparison panels
    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    /// Decode `screenshot` and draw a grid over it
    pub fn render_grid(&self, screenshot: &[u8], cell_size: u32) -> Result<GridOverlay> {
        let source = decode_screenshot(screenshot)?;
        self.render_grid_image(&source, cell_size)
    }

    /// Draw a grid over a decoded screenshot, leaving the input untouched
    pub fn render_grid_image(&self, screenshot: &RgbaImage, cell_size: u32) -> Result<GridOverlay> {
        if cell_size == 0 {
            return Err(PuppeteerError::RenderFailed("Grid cell size must be positive".to_string()));
        }

        let mut image = screenshot.clone();
        let (width, height) = image.dimensions();
        let vertical = grid_positions(width, cell_size);
        let horizontal = grid_positions(height, cell_size);
        let (right, bottom) = (width.saturating_sub(1) as f32, height.saturating_sub(1) as f32);

        for &x in &vertical {
            draw_line_segment_mut(&mut image, (x as f32, 0.0), (x as f32, bottom), GRID_LINE_COLOR);
        }
        for &y in &horizontal {
            draw_line_segment_mut(&mut image, (0.0, y as f32), (right, y as f32), GRID_LINE_COLOR);
        }

        // Labels go on last so no line crosses them
        for &y in &horizontal {
            for &x in &vertical {
                self.draw_coordinate(&mut image, x, y);
            }
        }

        Ok(GridOverlay {
            image,
            vertical,
            horizontal,
        })
    }

    /// Original screenshot on the left, gridded copy on the right, titled above
    pub fn render_comparison(&self, screenshot: &[u8], cell_size: u32) -> Result<RgbaImage> {
        let source = decode_screenshot(screenshot)?;
        self.render_comparison_image(&source, cell_size)
    }

    pub fn render_comparison_image(&self, screenshot: &RgbaImage, cell_size: u32) -> Result<RgbaImage> {
        let grid = self.render_grid_image(screenshot, cell_size)?;
        let (width, height) = screenshot.dimensions();
        let (_, title_h) = self.font.measure("Original");
        let header = title_h + 2 * HEADER_PADDING;

        let mut canvas = RgbaImage::from_pixel(2 * width + self.gap, height + header, COORD_BACKGROUND);

        let right_x = width + self.gap;
        let pad = HEADER_PADDING as i32;
        self.font.draw(&mut canvas, pad, pad, "Original", COORD_TEXT_COLOR);
        self.font.draw(&mut canvas, right_x as i32 + pad, pad, "Coordinates", COORD_TEXT_COLOR);

        imageops::replace(&mut canvas, screenshot, 0, header as i64);
        imageops::replace(&mut canvas, &grid.image, right_x as i64, header as i64);
        Ok(canvas)
    }

    fn draw_coordinate(&self, image: &mut RgbaImage, x: u32, y: u32) {
        let text = coordinate_label(x, y);
        let (text_w, text_h) = self.font.measure(&text);
        let (label_w, label_h) = (text_w + 2 * COORD_PADDING, text_h + 2 * COORD_PADDING);

        let (lx, ly) = place_coordinate(x, y, label_w, label_h, image.width(), image.height());

        draw_filled_rect_mut(image, Rect::at(lx, ly).of_size(label_w, label_h), COORD_BACKGROUND);
        self.font.draw(
            image,
            lx + COORD_PADDING as i32,
            ly + COORD_PADDING as i32,
            &text,
            COORD_TEXT_COLOR,
        );
    }
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self::new(LabelFont::bitmap(1))
    }
}
