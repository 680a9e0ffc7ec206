//! Crosshair-driven lineout extraction for 2D channel data, covering both
//! uniform grids and scattered point clouds.

use crate::data::{ChannelData, DataBundle, Distribution};
use crate::filters::filter::{Filter, FilterBase, LineoutMap};
use crate::graph_item::{ChannelItem, GraphItem, PositionSource, SpreadAxis, SpreadItem};
use crate::lineout::{LineoutData, LineoutError};
use ndarray::{arr1, Array1, Array2};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Extracts a full row and column through the crosshair from every 2D
/// channel of a bundle.
///
/// Channels are resolved against their graphical items through `image_keys`:
/// the i-th channel array of a bundle belongs to `items[image_keys[i]]`.
/// The items' extents must match the channel arrays (`height x width`).
pub struct Filter2DFromCrosshair {
    base: FilterBase,
    crosshair: Rc<dyn PositionSource>,
    items: BTreeMap<String, ChannelItem>,
    image_keys: Vec<String>,
}

impl Filter2DFromCrosshair {
    pub fn new(
        crosshair: Rc<dyn PositionSource>,
        items: BTreeMap<String, ChannelItem>,
        image_keys: Vec<String>,
    ) -> Self {
        Filter2DFromCrosshair {
            base: FilterBase::new(),
            crosshair,
            items,
            image_keys,
        }
    }

    /// Uniform-grid extraction at view position `(x, y)`.
    ///
    /// The crosshair is mapped into item pixel coordinates and rounded to
    /// the nearest pixel. The row and column checks are independent: an
    /// out-of-range row zero-fills only the horizontal lineout, an
    /// out-of-range column only the vertical one. The integrated value is
    /// the pixel under the crosshair, or `0` if either index is out.
    fn get_data_from_uniform(
        item: &dyn GraphItem,
        data: &Array2<f32>,
        x: f32,
        y: f32,
    ) -> Result<LineoutData, LineoutError> {
        let width = item.width();
        let height = item.height();
        let hor_axis = Array1::linspace(0.0, width as f32 - 1.0, width);
        let ver_axis = Array1::linspace(0.0, height as f32 - 1.0, height);

        let (indx, indy) = item.map_view_to_item(x, y);
        let row = indy.round();
        let col = indx.round();
        let row_in = row >= 0.0 && (row as usize) < ver_axis.len();
        let col_in = col >= 0.0 && (col as usize) < hor_axis.len();

        let hor_data = if row_in {
            data.row(row as usize).to_owned()
        } else {
            Array1::zeros(hor_axis.len())
        };
        let ver_data = if col_in {
            data.column(col as usize).to_owned()
        } else {
            Array1::zeros(ver_axis.len())
        };
        let int_data = if row_in && col_in {
            data[[row as usize, col as usize]]
        } else {
            0.0
        };

        LineoutData::new(hor_axis, hor_data, ver_axis, ver_data, Some(arr1(&[int_data])))
    }

    /// Scattered-point extraction at view position `(x, y)`.
    ///
    /// The horizontal lineout collects all samples sharing the crosshair's
    /// y coordinate, sorted by ascending x; the vertical one all samples
    /// sharing its x coordinate, sorted by ascending y. The integrated value
    /// is the item's value at the crosshair.
    fn get_data_from_spread(
        item: &dyn SpreadItem,
        x: f32,
        y: f32,
    ) -> Result<LineoutData, LineoutError> {
        let (posx, posy) = item.map_view_to_item(x, y);

        let (points, values) = item.get_points_at(SpreadAxis::Y, posy);
        let (hor_axis, hor_data) = sorted_profile(&points, &values, 0);

        let (points, values) = item.get_points_at(SpreadAxis::X, posx);
        let (ver_axis, ver_data) = sorted_profile(&points, &values, 1);

        let int_data = item.get_val_at((posx, posy));
        LineoutData::new(hor_axis, hor_data, ver_axis, ver_data, Some(arr1(&[int_data])))
    }
}

/// Sorts a point query result by ascending coordinate along `coord` (0 for
/// x, 1 for y) and returns the paired axis/data arrays.
fn sorted_profile(
    points: &Array2<f32>,
    values: &Array1<f32>,
    coord: usize,
) -> (Array1<f32>, Array1<f32>) {
    let mut order: Vec<usize> = (0..points.nrows()).collect();
    order.sort_by(|&a, &b| points[[a, coord]].total_cmp(&points[[b, coord]]));
    let axis: Array1<f32> = order.iter().map(|&i| points[[i, coord]]).collect();
    let data: Array1<f32> = order.iter().map(|&i| values[i]).collect();
    (axis, data)
}

impl Filter for Filter2DFromCrosshair {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FilterBase {
        &mut self.base
    }

    fn extract(&mut self, data: &DataBundle) -> Result<Option<LineoutMap>, LineoutError> {
        let (x, y) = self.crosshair.position();
        let mut map = LineoutMap::new();

        for (index, key) in self.image_keys.iter().enumerate() {
            let Some(channel) = data.data.get(index) else {
                continue;
            };
            let Some(item) = self.items.get(key) else {
                continue;
            };
            let lineout = match (data.distribution, item, channel) {
                (Distribution::Uniform, ChannelItem::Uniform(item), ChannelData::D2(array)) => {
                    Self::get_data_from_uniform(item.as_ref(), array, x, y)?
                }
                (Distribution::Spread, ChannelItem::Spread(item), ChannelData::D2(_)) => {
                    Self::get_data_from_spread(item.as_ref(), x, y)?
                }
                _ => continue,
            };
            map.insert(key.clone(), lineout);
        }
        Ok(Some(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_item::{Crosshair, ItemTransform, SpreadDataItem, UniformImageItem};
    use approx::assert_relative_eq;
    use ndarray::arr2;

    fn uniform_filter(crosshair: Rc<Crosshair>) -> Filter2DFromCrosshair {
        let item = Rc::new(UniformImageItem::new(5, 5, ItemTransform::IDENTITY));
        let mut items = BTreeMap::new();
        items.insert("red".to_string(), ChannelItem::Uniform(item));
        Filter2DFromCrosshair::new(crosshair, items, vec!["red".to_string()])
    }

    fn grid_5x5() -> Array2<f32> {
        Array2::from_shape_fn((5, 5), |(i, j)| (i * 5 + j) as f32)
    }

    #[test]
    fn test_uniform_in_bounds_extracts_row_column_and_pixel() {
        let crosshair = Rc::new(Crosshair::new(2.0, 2.0));
        let mut filter = uniform_filter(Rc::clone(&crosshair));
        let mut bundle = DataBundle::new(Distribution::Uniform);
        bundle.push_channel("red", ChannelData::D2(grid_5x5()));

        let map = filter.extract(&bundle).unwrap().unwrap();
        let lineout = &map["red"];
        assert_eq!(lineout.hor_data, grid_5x5().row(2).to_owned());
        assert_eq!(lineout.ver_data, grid_5x5().column(2).to_owned());
        assert_relative_eq!(lineout.int_data[0], 12.0);
    }

    #[test]
    fn test_uniform_out_of_bounds_zero_fills_both_axes() {
        let crosshair = Rc::new(Crosshair::new(10.0, 10.0));
        let mut filter = uniform_filter(crosshair);
        let mut bundle = DataBundle::new(Distribution::Uniform);
        bundle.push_channel("red", ChannelData::D2(grid_5x5()));

        let map = filter.extract(&bundle).unwrap().unwrap();
        let lineout = &map["red"];
        assert_eq!(lineout.hor_data, Array1::zeros(5));
        assert_eq!(lineout.ver_data, Array1::zeros(5));
        assert_relative_eq!(lineout.int_data[0], 0.0);
    }

    #[test]
    fn test_uniform_partially_out_of_bounds_zero_fills_one_axis() {
        // row index out (y = 10), column index in (x = 2): the horizontal
        // lineout zero-fills, the vertical one is the real column, and the
        // integrated value falls back to 0.
        let crosshair = Rc::new(Crosshair::new(2.0, 10.0));
        let mut filter = uniform_filter(crosshair);
        let mut bundle = DataBundle::new(Distribution::Uniform);
        bundle.push_channel("red", ChannelData::D2(grid_5x5()));

        let map = filter.extract(&bundle).unwrap().unwrap();
        let lineout = &map["red"];
        assert_eq!(lineout.hor_data, Array1::zeros(5));
        assert_eq!(lineout.ver_data, grid_5x5().column(2).to_owned());
        assert_relative_eq!(lineout.int_data[0], 0.0);
    }

    #[test]
    fn test_spread_profiles_sorted_by_coordinate() {
        let samples = arr2(&[
            [2.0, 0.0, 30.0],
            [0.0, 0.0, 10.0],
            [1.0, 0.0, 20.0],
            [0.0, 2.0, 50.0],
            [0.0, 1.0, 40.0],
        ]);
        let item = Rc::new(SpreadDataItem::new(samples.clone(), ItemTransform::IDENTITY));
        let mut items = BTreeMap::new();
        items.insert("spread".to_string(), ChannelItem::Spread(item));
        let crosshair = Rc::new(Crosshair::new(0.0, 0.0));
        let mut filter =
            Filter2DFromCrosshair::new(crosshair, items, vec!["spread".to_string()]);

        let mut bundle = DataBundle::new(Distribution::Spread);
        bundle.push_channel("spread", ChannelData::D2(samples));

        let map = filter.extract(&bundle).unwrap().unwrap();
        let lineout = &map["spread"];
        assert_eq!(lineout.hor_axis, arr1(&[0.0, 1.0, 2.0]));
        assert_eq!(lineout.hor_data, arr1(&[10.0, 20.0, 30.0]));
        assert_eq!(lineout.ver_axis, arr1(&[0.0, 1.0, 2.0]));
        assert_eq!(lineout.ver_data, arr1(&[10.0, 40.0, 50.0]));
        assert_relative_eq!(lineout.int_data[0], 10.0);
    }
}
