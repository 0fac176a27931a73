// SPDX-License-Identifier: MIT OR Apache-2.0
//! Normalized and pixel-space geometry.

use serde::{Deserialize, Serialize};

/// A normalized position on the diagram, percent coordinates in `[0, 100]`.
///
/// `top`/`left` mirror how diagram positions are authored: offsets from the
/// top-left corner of the reference surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Vertical offset in percent of the surface height
    pub top: f32,
    /// Horizontal offset in percent of the surface width
    pub left: f32,
}

impl Anchor {
    /// Create an anchor from percent coordinates
    pub fn new(top: f32, left: f32) -> Self {
        Self { top, left }
    }

    /// Whether both coordinates are inside `[0, 100]`
    pub fn in_bounds(&self) -> bool {
        (0.0..=100.0).contains(&self.top) && (0.0..=100.0).contains(&self.left)
    }

    /// Convert to pixel space against the currently rendered surface size
    pub fn to_pixels(&self, viewport: Viewport) -> PixelPoint {
        PixelPoint {
            x: self.left / 100.0 * viewport.width,
            y: self.top / 100.0 * viewport.height,
        }
    }
}

/// Rendered pixel size of the reference surface, read at animation time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport from pixel dimensions
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A point in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    /// Horizontal pixel coordinate
    pub x: f32,
    /// Vertical pixel coordinate
    pub y: f32,
}

impl PixelPoint {
    /// Create a pixel point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`
    pub fn lerp(&self, other: PixelPoint, t: f32) -> PixelPoint {
        PixelPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}
