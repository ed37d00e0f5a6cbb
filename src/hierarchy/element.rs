use crate::error::{PuppeteerError, Result};
use crate::hierarchy::node::RawNode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BOUNDS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(-?\d+),(-?\d+)\]\[(-?\d+),(-?\d+)\]$").expect("bounds pattern is valid")
});

/// Screen coordinates of an element, in device pixels
///
/// Boxes produced by [`BoundingBox::new`] or [`BoundingBox::parse`] always
/// satisfy `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// A single pixel position
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl BoundingBox {
    /// Create a validated BoundingBox
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self> {
        if x1 >= x2 || y1 >= y2 {
            return Err(PuppeteerError::ParseFailed(format!(
                "Degenerate bounds [{},{}][{},{}]",
                x1, y1, x2, y2
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Parse a uiautomator bounds string such as `[10,20][110,220]`
    pub fn parse(bounds: &str) -> Result<Self> {
        let caps = BOUNDS_PATTERN
            .captures(bounds.trim())
            .ok_or_else(|| PuppeteerError::ParseFailed(format!("Invalid bounds '{}'", bounds)))?;

        let mut coords = [0i32; 4];
        for (slot, coord) in coords.iter_mut().enumerate() {
            *coord = caps[slot + 1].parse().map_err(|e| {
                PuppeteerError::ParseFailed(format!("Invalid coordinate in bounds '{}': {}", bounds, e))
            })?;
        }

        Self::new(coords[0], coords[1], coords[2], coords[3])
    }

    /// Center point, rounded toward negative infinity
    pub fn center(&self) -> Point {
        let cx = (self.x1 as i64 + self.x2 as i64).div_euclid(2);
        let cy = (self.y1 as i64 + self.y2 as i64).div_euclid(2);
        Point::new(cx as i32, cy as i32)
    }

    pub fn width(&self) -> u32 {
        (self.x2 as i64 - self.x1 as i64).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 as i64 - self.y1 as i64).max(0) as u32
    }

    /// Calculate the area of the bounding box
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Check whether a point lies inside the box (right and bottom edges excluded)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x < self.x2 && point.y >= self.y1 && point.y < self.y2
    }

    /// Map device coordinates onto a scaled, padded canvas
    ///
    /// Each coordinate is multiplied by `scale`, floored, then offset by `pad`.
    /// The result is not re-validated: a tiny box may collapse at small scales.
    /// Coordinates that leave the i32 range saturate at its limits.
    pub fn scale_and_translate(&self, scale: f64, pad: i32) -> BoundingBox {
        let map = |v: i32| {
            let scaled = (v as f64 * scale).floor() as i64 + pad as i64;
            scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32
        };
        BoundingBox {
            x1: map(self.x1),
            y1: map(self.y1),
            x2: map(self.x2),
            y2: map(self.y2),
        }
    }
}

/// Read and validate the bounds of a raw node
pub fn extract_box(node: &RawNode) -> Result<BoundingBox> {
    let bounds = node.bounds.as_deref().ok_or_else(|| {
        PuppeteerError::ParseFailed(format!("Node '{}' has no bounds attribute", node.class_name))
    })?;
    BoundingBox::parse(bounds)
}

/// An interactive element extracted from a hierarchy dump
///
/// Immutable once built; its index lives in the owning [`ElementMap`](super::ElementMap).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElementNode {
    name: String,
    class_name: String,
    bounds: BoundingBox,
    center: Point,
    clickable: bool,
    focusable: bool,
}

impl ElementNode {
    /// Create a new ElementNode; the center is derived from `bounds`
    pub fn new(
        name: impl Into<String>,
        class_name: impl Into<String>,
        bounds: BoundingBox,
        clickable: bool,
        focusable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            center: bounds.center(),
            bounds,
            clickable,
            focusable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Tap target for this element
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn is_clickable(&self) -> bool {
        self.clickable
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }
}

/// Serialized form of an indexed element handed to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElementRecord {
    pub index: usize,
    pub name: String,
    pub center: Point,
    pub bbox: BoundingBox,
    pub class_name: String,
    pub clickable: bool,
    pub focusable: bool,
}

impl ElementRecord {
    pub fn from_element(index: usize, element: &ElementNode) -> Self {
        Self {
            index,
            name: element.name.clone(),
            center: element.center,
            bbox: element.bounds,
            class_name: element.class_name.clone(),
            clickable: element.clickable,
            focusable: element.focusable,
        }
    }
}
