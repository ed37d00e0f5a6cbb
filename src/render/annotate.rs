use crate::error::{PuppeteerError, Result};
use crate::hierarchy::{BoundingBox, ElementMap};
use crate::render::font::LabelFont;
use crate::render::palette::{ColorSource, LABEL_TEXT_COLOR};
use crate::render::{decode_screenshot, encode_png};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

/// Canvas color around the pasted screenshot
pub const BACKGROUND_COLOR: Rgba<u8> = Rgba([240, 240, 240, 255]);

/// Where a label ended up on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelBox {
    pub index: usize,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color: Rgba<u8>,
}

/// A screenshot with every element outlined and labelled `"{index}: {name}"`
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    image: RgbaImage,
    elements: ElementMap,
    labels: Vec<LabelBox>,
}

impl AnnotatedImage {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Elements the overlay was built from
    pub fn elements(&self) -> &ElementMap {
        &self.elements
    }

    /// Label placements in index order
    pub fn labels(&self) -> &[LabelBox] {
        &self.labels
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the overlay as PNG bytes
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }
}

/// Result of a render that degrades to the source image on failure
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    Annotated(AnnotatedImage),
    /// Untouched screenshot bytes
    Original(Vec<u8>),
}

impl RenderOutcome {
    pub fn is_annotated(&self) -> bool {
        matches!(self, RenderOutcome::Annotated(_))
    }

    /// PNG bytes of the annotated image, or the original bytes unchanged
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            RenderOutcome::Annotated(annotated) => annotated.to_png(),
            RenderOutcome::Original(bytes) => Ok(bytes),
        }
    }
}

/// Draws element boxes and labels over a screenshot
#[derive(Debug, Clone)]
pub struct Annotator {
    font: LabelFont,
    seed: Option<u64>,
    stroke_width: u32,
    label_margin: i32,
    label_padding: u32,
}

impl Annotator {
    /// Create an annotator with a 2px stroke and unseeded colors
    pub fn new(font: LabelFont) -> Self {
        Self {
            font,
            seed: None,
            stroke_width: 2,
            label_margin: 2,
            label_padding: 2,
        }
    }

    /// Builder method: fix the color sequence
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set box stroke width
    pub fn with_stroke_width(mut self, width: u32) -> Self {
        self.stroke_width = width.max(1);
        self
    }

    /// Builder method: set gap between a label and its box
    pub fn with_label_margin(mut self, margin: i32) -> Self {
        self.label_margin = margin.max(0);
        self
    }

    /// Decode `screenshot` and draw every element onto it
    pub fn render(
        &self,
        screenshot: &[u8],
        elements: &ElementMap,
        scale: f64,
        padding: u32,
    ) -> Result<AnnotatedImage> {
        let source = decode_screenshot(screenshot)?;
        self.render_image(&source, elements, scale, padding)
    }

    /// Draw every element onto an already decoded screenshot
    pub fn render_image(
        &self,
        screenshot: &RgbaImage,
        elements: &ElementMap,
        scale: f64,
        padding: u32,
    ) -> Result<AnnotatedImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PuppeteerError::RenderFailed(format!("Invalid scale factor {}", scale)));
        }

        let mut canvas = compose_canvas(screenshot, scale, padding);
        let mut colors = ColorSource::new(self.seed);
        let mut labels = Vec::with_capacity(elements.len());
        let pad = padding.min(i32::MAX as u32) as i32;

        for (index, element) in elements.iter() {
            let color = colors.next_color();
            let target = element.bounds().scale_and_translate(scale, pad);

            self.draw_outline(&mut canvas, &target, color);

            let text = format!("{}: {}", index, element.name());
            let (text_w, text_h) = self.font.measure(&text);
            let label_w = text_w + 2 * self.label_padding;
            let label_h = text_h + 2 * self.label_padding;
            let (x, y) = place_label(
                &target,
                label_w,
                label_h,
                canvas.width(),
                canvas.height(),
                self.label_margin,
            );

            draw_filled_rect_mut(&mut canvas, Rect::at(x, y).of_size(label_w, label_h), color);
            self.font.draw(
                &mut canvas,
                x + self.label_padding as i32,
                y + self.label_padding as i32,
                &text,
                LABEL_TEXT_COLOR,
            );

            labels.push(LabelBox {
                index,
                x,
                y,
                width: label_w,
                height: label_h,
                color,
            });
        }

        Ok(AnnotatedImage {
            image: canvas,
            elements: elements.clone(),
            labels,
        })
    }

    /// Like [`Annotator::render`], but hands back the source bytes if rendering fails
    pub fn render_or_original(
        &self,
        screenshot: &[u8],
        elements: &ElementMap,
        scale: f64,
        padding: u32,
    ) -> RenderOutcome {
        match self.render(screenshot, elements, scale, padding) {
            Ok(annotated) => RenderOutcome::Annotated(annotated),
            Err(e) => {
                log::warn!("Annotation failed, returning plain screenshot: {}", e);
                RenderOutcome::Original(screenshot.to_vec())
            }
        }
    }

    fn draw_outline(&self, canvas: &mut RgbaImage, target: &BoundingBox, color: Rgba<u8>) {
        // Edges beyond the canvas stay beyond it, just not by more than the stroke
        let stroke = self.stroke_width.min(i32::MAX as u32) as i32;
        let clip = |v: i32, extent: u32| v.clamp(-stroke, (extent as i32).saturating_add(stroke));
        let clipped = BoundingBox {
            x1: clip(target.x1, canvas.width()),
            y1: clip(target.y1, canvas.height()),
            x2: clip(target.x2, canvas.width()),
            y2: clip(target.y2, canvas.height()),
        };

        let (w, h) = (clipped.width(), clipped.height());
        for t in 0..self.stroke_width {
            let inset_w = w.saturating_sub(t.saturating_mul(2));
            let inset_h = h.saturating_sub(t.saturating_mul(2));
            if inset_w == 0 || inset_h == 0 {
                break;
            }
            let t = t as i32;
            let rect = Rect::at(clipped.x1.saturating_add(t), clipped.y1.saturating_add(t)).of_size(inset_w, inset_h);
            draw_hollow_rect_mut(canvas, rect, color);
        }
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(LabelFont::default())
    }
}

/// Resize the screenshot uniformly and paste it centered on a padded canvas
fn compose_canvas(screenshot: &RgbaImage, scale: f64, padding: u32) -> RgbaImage {
    let scaled_w = ((screenshot.width() as f64 * scale).floor() as u32).max(1);
    let scaled_h = ((screenshot.height() as f64 * scale).floor() as u32).max(1);

    let resized = if (scaled_w, scaled_h) == screenshot.dimensions() {
        screenshot.clone()
    } else {
        imageops::resize(screenshot, scaled_w, scaled_h, FilterType::Lanczos3)
    };

    let margin = padding.saturating_mul(2);
    let mut canvas = RgbaImage::from_pixel(
        scaled_w.saturating_add(margin),
        scaled_h.saturating_add(margin),
        BACKGROUND_COLOR,
    );
    imageops::replace(&mut canvas, &resized, padding as i64, padding as i64);
    canvas
}

/// Top-left corner for a label sitting just above `target`
///
/// The label is kept on the canvas: x is clamped to
/// `[0, canvas_width - 1 - label_width]`, y to `[0, canvas_height - 1 - label_height]`.
/// Near the top edge this lets the label overlap its own box.
pub fn place_label(
    target: &BoundingBox,
    label_w: u32,
    label_h: u32,
    canvas_w: u32,
    canvas_h: u32,
    margin: i32,
) -> (i32, i32) {
    let max_x = (canvas_w as i32 - 1 - label_w as i32).max(0);
    let max_y = (canvas_h as i32 - 1 - label_h as i32).max(0);

    let x = target.x1.clamp(0, max_x);
    let y = target
        .y1
        .saturating_sub(label_h.min(i32::MAX as u32) as i32)
        .saturating_sub(margin)
        .clamp(0, max_y);
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::ElementNode;

    const SHOT: Rgba<u8> = Rgba([10, 10, 10, 255]);

    fn screenshot(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, SHOT)
    }

    // Resampling may be off by one on uniform input
    fn is_screenshot_pixel(pixel: &Rgba<u8>) -> bool {
        pixel.0.iter().zip(SHOT.0).all(|(a, b)| (*a as i32 - b as i32).abs() <= 1)
    }

    fn elements(boxes: &[(&str, i32, i32, i32, i32)]) -> ElementMap {
        let mut map = ElementMap::new();
        for &(name, x1, y1, x2, y2) in boxes {
            let bbox = BoundingBox::new(x1, y1, x2, y2).unwrap();
            map.register(ElementNode::new(name, "android.widget.Button", bbox, true, false));
        }
        map
    }

    #[test]
    fn test_canvas_size_and_padding() {
        let annotator = Annotator::new(LabelFont::bitmap(1)).with_seed(1);
        let result = annotator
            .render_image(&screenshot(200, 400), &ElementMap::new(), 0.5, 15)
            .unwrap();

        assert_eq!(result.image().dimensions(), (130, 230));
        assert_eq!(*result.image().get_pixel(0, 0), BACKGROUND_COLOR);
        assert!(is_screenshot_pixel(result.image().get_pixel(15, 15)));
        assert!(is_screenshot_pixel(result.image().get_pixel(114, 214)));
        assert_eq!(*result.image().get_pixel(115, 215), BACKGROUND_COLOR);
    }

    #[test]
    fn test_box_outline_drawn_at_scaled_position() {
        let annotator = Annotator::new(LabelFont::bitmap(1)).with_seed(9);
        let map = elements(&[("OK", 100, 200, 180, 300)]);
        let result = annotator.render_image(&screenshot(400, 800), &map, 0.5, 15).unwrap();

        let color = result.labels()[0].color;
        // (100,200)-(180,300) scaled by 0.5 and shifted by 15 -> (65,115)-(105,165)
        assert_eq!(*result.image().get_pixel(65, 140), color);
        assert_eq!(*result.image().get_pixel(66, 140), color);
        assert_eq!(*result.image().get_pixel(104, 140), color);
        assert!(is_screenshot_pixel(result.image().get_pixel(85, 140)));
    }

    #[test]
    fn test_label_sits_above_box() {
        let annotator = Annotator::new(LabelFont::bitmap(1)).with_seed(3);
        let map = elements(&[("OK", 100, 200, 180, 300)]);
        let result = annotator.render_image(&screenshot(400, 800), &map, 0.5, 15).unwrap();

        let label = result.labels()[0];
        // "0: OK" is 5 glyphs of 8px plus 2px padding on each side
        assert_eq!((label.width, label.height), (44, 12));
        assert_eq!(label.x, 65);
        assert_eq!(label.y, 115 - 12 - 2);
        assert_eq!(*result.image().get_pixel(label.x as u32, label.y as u32), label.color);
    }

    #[test]
    fn test_label_clamped_at_top_left_corner() {
        let annotator = Annotator::new(LabelFont::bitmap(2)).with_seed(5);
        let map = elements(&[("Menu", 0, 0, 50, 50)]);
        let result = annotator.render_image(&screenshot(300, 300), &map, 1.0, 0).unwrap();

        let label = result.labels()[0];
        let (w, h) = result.image().dimensions();
        assert!(label.x >= 0 && label.y >= 0);
        assert!(label.x as u32 + label.width <= w);
        assert!(label.y as u32 + label.height <= h);
    }

    #[test]
    fn test_label_clamped_at_right_edge() {
        let target = BoundingBox::new(290, 100, 299, 120).unwrap();
        let (x, y) = place_label(&target, 40, 12, 300, 300, 2);
        assert_eq!(x, 300 - 1 - 40);
        assert_eq!(y, 100 - 12 - 2);

        // Label wider than the canvas still starts on it
        let (x, _) = place_label(&target, 500, 12, 300, 300, 2);
        assert_eq!(x, 0);
    }

    #[test]
    fn test_seed_reproduces_colors() {
        let map = elements(&[("A", 0, 0, 10, 10), ("B", 20, 20, 40, 40), ("C", 50, 50, 90, 90)]);
        let shot = screenshot(100, 100);

        let first = Annotator::new(LabelFont::bitmap(1)).with_seed(11).render_image(&shot, &map, 1.0, 15).unwrap();
        let second = Annotator::new(LabelFont::bitmap(1)).with_seed(11).render_image(&shot, &map, 1.0, 15).unwrap();

        assert_eq!(first.labels(), second.labels());
        assert_eq!(first.image(), second.image());
    }

    #[test]
    fn test_labels_follow_index_order() {
        let map = elements(&[("A", 0, 0, 10, 10), ("B", 20, 20, 40, 40)]);
        let result = Annotator::default()
            .with_seed(2)
            .render_image(&screenshot(100, 100), &map, 1.0, 15)
            .unwrap();

        let indices: Vec<_> = result.labels().iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(result.elements().len(), 2);
    }

    #[test]
    fn test_extreme_bounds_render() {
        let map = elements(&[
            ("Wide", 0, 0, i32::MAX, 100),
            ("Far", i32::MAX - 10, i32::MAX - 10, i32::MAX, i32::MAX),
        ]);
        let result = Annotator::new(LabelFont::bitmap(1))
            .with_seed(4)
            .render_image(&screenshot(100, 200), &map, 1.0, 15)
            .unwrap();

        assert_eq!(result.image().dimensions(), (130, 230));
        assert_eq!(result.labels().len(), 2);
        let wide = result.labels()[0];
        assert_eq!(wide.x, 15);
        // The outline's left edge lands on the canvas in the element's color
        assert_eq!(*result.image().get_pixel(15, 50), wide.color);
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let annotator = Annotator::default();
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = annotator.render_image(&screenshot(10, 10), &ElementMap::new(), scale, 0);
            assert!(matches!(result, Err(PuppeteerError::RenderFailed(_))));
        }
    }

    #[test]
    fn test_corrupt_screenshot_falls_back_to_original() {
        let annotator = Annotator::default();
        let bytes = b"definitely not a png".to_vec();

        assert!(matches!(
            annotator.render(&bytes, &ElementMap::new(), 1.0, 0),
            Err(PuppeteerError::RenderFailed(_))
        ));

        let outcome = annotator.render_or_original(&bytes, &ElementMap::new(), 1.0, 0);
        assert!(!outcome.is_annotated());
        assert_eq!(outcome.into_bytes().unwrap(), bytes);
    }
}
