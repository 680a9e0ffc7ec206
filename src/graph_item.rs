//! Collaborator interfaces of the graphics layer.
//!
//! The filters never own display state; they read the current crosshair
//! position through [`PositionSource`] and resolve geometry through the item
//! traits: [`GraphItem`] for uniform images (view/item coordinate mapping,
//! pixel extents, region cropping) and [`SpreadItem`] for scattered-point
//! clouds (fixed-coordinate queries, nearest-value lookup).
//!
//! [`UniformImageItem`] and [`SpreadDataItem`] are reference implementations
//! over plain in-memory data, placed in the view by an [`ItemTransform`].

use crate::roi::ShapedRoi;
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Axis selector for scattered-point queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpreadAxis {
    X,
    Y,
}

/// Read-only source of the current crosshair position, in view coordinates.
pub trait PositionSource {
    fn position(&self) -> (f32, f32);
}

/// Interactively positioned point probe.
///
/// The position is mutated by the surrounding UI (through a shared handle)
/// and read by the filters once per extraction.
#[derive(Debug, Default)]
pub struct Crosshair {
    pos: Cell<(f32, f32)>,
}

impl Crosshair {
    pub fn new(x: f32, y: f32) -> Self {
        Crosshair {
            pos: Cell::new((x, y)),
        }
    }

    pub fn set_position(&self, x: f32, y: f32) {
        self.pos.set((x, y));
    }
}

impl PositionSource for Crosshair {
    fn position(&self) -> (f32, f32) {
        self.pos.get()
    }
}

/// Affine placement of an item in view space, covering scale, flips,
/// rotation and translation.
///
/// `apply` maps item coordinates into the view; `invert` maps view
/// coordinates back into the item. The linear part must be invertible.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemTransform {
    /// Row-major 2x2 linear part.
    pub m: [[f32; 2]; 2],
    /// Translation applied after the linear part.
    pub t: [f32; 2],
}

impl Default for ItemTransform {
    fn default() -> Self {
        ItemTransform::IDENTITY
    }
}

impl ItemTransform {
    pub const IDENTITY: ItemTransform = ItemTransform {
        m: [[1.0, 0.0], [0.0, 1.0]],
        t: [0.0, 0.0],
    };

    /// Pure scaling; negative factors flip the corresponding axis.
    pub fn scale(sx: f32, sy: f32) -> Self {
        ItemTransform {
            m: [[sx, 0.0], [0.0, sy]],
            t: [0.0, 0.0],
        }
    }

    /// Counter-clockwise rotation by `radians`.
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        ItemTransform {
            m: [[cos, -sin], [sin, cos]],
            t: [0.0, 0.0],
        }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        ItemTransform {
            m: [[1.0, 0.0], [0.0, 1.0]],
            t: [tx, ty],
        }
    }

    /// Composes two placements: `self` first, then `other`.
    pub fn then(self, other: ItemTransform) -> Self {
        let a = other.m;
        let b = self.m;
        ItemTransform {
            m: [
                [
                    a[0][0] * b[0][0] + a[0][1] * b[1][0],
                    a[0][0] * b[0][1] + a[0][1] * b[1][1],
                ],
                [
                    a[1][0] * b[0][0] + a[1][1] * b[1][0],
                    a[1][0] * b[0][1] + a[1][1] * b[1][1],
                ],
            ],
            t: [
                a[0][0] * self.t[0] + a[0][1] * self.t[1] + other.t[0],
                a[1][0] * self.t[0] + a[1][1] * self.t[1] + other.t[1],
            ],
        }
    }

    /// Maps an item-space point into view space.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.m[0][0] * x + self.m[0][1] * y + self.t[0],
            self.m[1][0] * x + self.m[1][1] * y + self.t[1],
        )
    }

    /// Maps a view-space point into item space. The linear part must have a
    /// non-zero determinant.
    pub fn invert(&self, x: f32, y: f32) -> (f32, f32) {
        let det = self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0];
        let dx = x - self.t[0];
        let dy = y - self.t[1];
        (
            (self.m[1][1] * dx - self.m[0][1] * dy) / det,
            (self.m[0][0] * dy - self.m[1][0] * dx) / det,
        )
    }
}

/// Sub-array extracted for a shaped region, together with the item
/// coordinates of every cell of the crop.
#[derive(Clone, Debug)]
pub struct RegionCrop {
    pub data: Array2<f32>,
    /// Item y coordinate (row position) of each cell.
    pub rows: Array2<f32>,
    /// Item x coordinate (column position) of each cell.
    pub cols: Array2<f32>,
}

/// A displayed uniform image: view placement, pixel extents, and region
/// cropping with mapped coordinates.
pub trait GraphItem {
    /// Maps a view-space point into the item's local pixel coordinates.
    fn map_view_to_item(&self, x: f32, y: f32) -> (f32, f32);

    /// Pixel width of the displayed data.
    fn width(&self) -> usize;

    /// Pixel height of the displayed data.
    fn height(&self) -> usize;

    /// Crops `data` to the axis-aligned bounds of `roi` and returns the
    /// sub-array plus the item coordinates of every cell, or `None` when the
    /// region does not intersect the data.
    fn extract_region(&self, data: &Array2<f32>, roi: &ShapedRoi) -> Option<RegionCrop>;
}

/// A displayed scattered-point cloud of `(x, y, value)` samples.
pub trait SpreadItem {
    /// Maps a view-space point into the item's local coordinates.
    fn map_view_to_item(&self, x: f32, y: f32) -> (f32, f32);

    /// All samples whose `axis` coordinate matches `value`, as `(points,
    /// values)` with points given as `N x 2` rows. Order is unspecified.
    fn get_points_at(&self, axis: SpreadAxis, value: f32) -> (Array2<f32>, Array1<f32>);

    /// Value of the item at a point (nearest sample).
    fn get_val_at(&self, point: (f32, f32)) -> f32;
}

/// Graphical item associated with a channel, tagged by the distribution it
/// displays.
#[derive(Clone)]
pub enum ChannelItem {
    Uniform(std::rc::Rc<dyn GraphItem>),
    Spread(std::rc::Rc<dyn SpreadItem>),
}

/// Reference [`GraphItem`] over a `height x width` pixel grid placed in the
/// view by an affine transform.
#[derive(Clone, Debug)]
pub struct UniformImageItem {
    transform: ItemTransform,
    width: usize,
    height: usize,
}

impl UniformImageItem {
    /// `transform` maps item (pixel) coordinates into view coordinates.
    pub fn new(width: usize, height: usize, transform: ItemTransform) -> Self {
        UniformImageItem {
            transform,
            width,
            height,
        }
    }
}

impl GraphItem for UniformImageItem {
    fn map_view_to_item(&self, x: f32, y: f32) -> (f32, f32) {
        self.transform.invert(x, y)
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn extract_region(&self, data: &Array2<f32>, roi: &ShapedRoi) -> Option<RegionCrop> {
        let (rows, cols) = data.dim();
        let (x0, y0, x1, y1) = roi.bounding_rect();
        if x1 <= 0.0 || y1 <= 0.0 || x0 >= cols as f32 || y0 >= rows as f32 {
            return None;
        }
        let c0 = x0.floor().max(0.0) as usize;
        let c1 = (x1.ceil() as usize).min(cols);
        let r0 = y0.floor().max(0.0) as usize;
        let r1 = (y1.ceil() as usize).min(rows);
        if c0 >= c1 || r0 >= r1 {
            return None;
        }
        let crop = data.slice(s![r0..r1, c0..c1]).to_owned();
        let (h, w) = crop.dim();
        let row_coords = Array2::from_shape_fn((h, w), |(i, _)| (r0 + i) as f32);
        let col_coords = Array2::from_shape_fn((h, w), |(_, j)| (c0 + j) as f32);
        Some(RegionCrop {
            data: crop,
            rows: row_coords,
            cols: col_coords,
        })
    }
}

/// Reference [`SpreadItem`] over an in-memory `N x 3` table of
/// `(x, y, value)` samples.
#[derive(Clone, Debug)]
pub struct SpreadDataItem {
    transform: ItemTransform,
    samples: Array2<f32>,
    /// Tolerance for fixed-coordinate queries; scattered coordinates rarely
    /// compare exactly equal once mapped through a transform.
    tolerance: f32,
}

impl SpreadDataItem {
    pub fn new(samples: Array2<f32>, transform: ItemTransform) -> Self {
        SpreadDataItem {
            transform,
            samples,
            tolerance: 1e-6,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl SpreadItem for SpreadDataItem {
    fn map_view_to_item(&self, x: f32, y: f32) -> (f32, f32) {
        self.transform.invert(x, y)
    }

    fn get_points_at(&self, axis: SpreadAxis, value: f32) -> (Array2<f32>, Array1<f32>) {
        let col = match axis {
            SpreadAxis::X => 0,
            SpreadAxis::Y => 1,
        };
        let mut points = Vec::new();
        let mut values = Vec::new();
        for row in self.samples.outer_iter() {
            if row.len() >= 3 && (row[col] - value).abs() <= self.tolerance {
                points.push([row[0], row[1]]);
                values.push(row[2]);
            }
        }
        let n = points.len();
        let points = Array2::from_shape_fn((n, 2), |(i, j)| points[i][j]);
        (points, Array1::from(values))
    }

    fn get_val_at(&self, point: (f32, f32)) -> f32 {
        let mut best = 0.0;
        let mut best_dist = f32::INFINITY;
        for row in self.samples.outer_iter() {
            if row.len() < 3 {
                continue;
            }
            let dx = row[0] - point.0;
            let dy = row[1] - point.1;
            let dist = dx * dx + dy * dy;
            if dist < best_dist {
                best_dist = dist;
                best = row[2];
            }
        }
        best
    }
}
