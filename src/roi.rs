//! Interactive regions of interest: 1D range selections and positioned 2D
//! shapes with a point-containment test, plus the per-ROI channel-selection
//! settings.
//!
//! Regions are owned and mutated by the surrounding UI; the filters only read
//! their current geometry through the accessors here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A 1D range selection along a horizontal axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRoi {
    pub min: f32,
    pub max: f32,
}

impl LinearRoi {
    pub fn new(min: f32, max: f32) -> Self {
        LinearRoi { min, max }
    }

    /// Current `(min, max)` range of the region.
    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }
}

/// Closed boundary of a 2D region, expressed in region-local coordinates
/// (the region origin is at `(0, 0)`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoiShape {
    /// Axis-aligned rectangle spanning `[0, width] x [0, height]`.
    Rect { width: f32, height: f32 },
    /// Ellipse inscribed in the `width x height` bounding box.
    Ellipse { width: f32, height: f32 },
    /// Arbitrary closed polygon given by its vertices.
    Polygon(Vec<[f32; 2]>),
}

impl RoiShape {
    /// Tests whether a region-local point lies inside the boundary.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        match self {
            RoiShape::Rect { width, height } => {
                x >= 0.0 && x <= *width && y >= 0.0 && y <= *height
            }
            RoiShape::Ellipse { width, height } => {
                let rx = width / 2.0;
                let ry = height / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let nx = (x - rx) / rx;
                let ny = (y - ry) / ry;
                nx * nx + ny * ny <= 1.0
            }
            RoiShape::Polygon(vertices) => point_in_polygon(vertices, x, y),
        }
    }

    /// Axis-aligned bounding box `(x0, y0, x1, y1)` in region-local
    /// coordinates.
    pub fn bounding_rect(&self) -> (f32, f32, f32, f32) {
        match self {
            RoiShape::Rect { width, height } | RoiShape::Ellipse { width, height } => {
                (0.0, 0.0, *width, *height)
            }
            RoiShape::Polygon(vertices) => {
                let mut x0 = f32::INFINITY;
                let mut y0 = f32::INFINITY;
                let mut x1 = f32::NEG_INFINITY;
                let mut y1 = f32::NEG_INFINITY;
                for v in vertices {
                    x0 = x0.min(v[0]);
                    y0 = y0.min(v[1]);
                    x1 = x1.max(v[0]);
                    y1 = y1.max(v[1]);
                }
                if vertices.is_empty() {
                    (0.0, 0.0, 0.0, 0.0)
                } else {
                    (x0, y0, x1, y1)
                }
            }
        }
    }
}

/// Even-odd ray casting against the polygon edges.
fn point_in_polygon(vertices: &[[f32; 2]], x: f32, y: f32) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i][0], vertices[i][1]);
        let (xj, yj) = (vertices[j][0], vertices[j][1]);
        if (yi > y) != (yj > y) {
            let x_cross = (xj - xi) * (y - yi) / (yj - yi) + xi;
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// A positioned 2D region: an origin in item coordinates plus a local shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapedRoi {
    /// Region origin in item coordinates.
    pub pos: (f32, f32),
    pub shape: RoiShape,
}

impl ShapedRoi {
    pub fn new(pos: (f32, f32), shape: RoiShape) -> Self {
        ShapedRoi { pos, shape }
    }

    /// Origin of the region in item coordinates.
    pub fn origin(&self) -> (f32, f32) {
        self.pos
    }

    /// Tests a point given in item coordinates, offsetting it into the
    /// region-local frame first.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.shape.contains(x - self.pos.0, y - self.pos.1)
    }

    /// Axis-aligned bounding box `(x0, y0, x1, y1)` in item coordinates.
    pub fn bounding_rect(&self) -> (f32, f32, f32, f32) {
        let (x0, y0, x1, y1) = self.shape.bounding_rect();
        (
            x0 + self.pos.0,
            y0 + self.pos.1,
            x1 + self.pos.0,
            y1 + self.pos.1,
        )
    }
}

/// Per-ROI configuration: which channel each region reduces.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoiSettings {
    use_channel: BTreeMap<String, String>,
}

impl RoiSettings {
    pub fn new() -> Self {
        RoiSettings::default()
    }

    pub fn set_channel(&mut self, roi_key: impl Into<String>, channel: impl Into<String>) {
        self.use_channel.insert(roi_key.into(), channel.into());
    }

    /// The channel label configured for a region, if any.
    pub fn channel_for(&self, roi_key: &str) -> Option<&str> {
        self.use_channel.get(roi_key).map(String::as_str)
    }
}
