//! Shaped-ROI-driven lineout extraction for 2D channel data, covering both
//! uniform grids and scattered point clouds.

use crate::data::{ChannelData, DataBundle, Distribution};
use crate::filters::filter::{Filter, FilterBase, LineoutMap};
use crate::graph_item::GraphItem;
use crate::lineout::{LineoutData, LineoutError};
use crate::roi::{RoiSettings, ShapedRoi};
use ndarray::{arr1, Array1, Array2};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Reduces every shaped 2D region to its marginal profiles and mean.
///
/// Uniform channels are cropped through the graphical item's region
/// extraction; spread channels are filtered sample by sample through the
/// region's containment test. Regions and their channel selection are owned
/// and mutated externally and only read here.
pub struct Filter2DFromRois {
    base: FilterBase,
    rois: Rc<RefCell<BTreeMap<String, ShapedRoi>>>,
    settings: Rc<RefCell<RoiSettings>>,
    image_keys: Vec<String>,
    item: Rc<dyn GraphItem>,
}

impl Filter2DFromRois {
    pub fn new(
        rois: Rc<RefCell<BTreeMap<String, ShapedRoi>>>,
        settings: Rc<RefCell<RoiSettings>>,
        image_keys: Vec<String>,
        item: Rc<dyn GraphItem>,
    ) -> Self {
        Filter2DFromRois {
            base: FilterBase::new(),
            rois,
            settings,
            image_keys,
            item,
        }
    }

    /// Uniform-grid reduction: crop the region's bounding area, then take
    /// the marginal means over rows and columns and the whole-crop mean.
    ///
    /// A region that misses the data entirely degenerates to an
    /// empty-but-valid lineout.
    fn get_xydata_uniform(
        &self,
        data: &Array2<f32>,
        roi: &ShapedRoi,
    ) -> Result<LineoutData, LineoutError> {
        let Some(crop) = self.item.extract_region(data, roi) else {
            return Ok(LineoutData::empty());
        };
        let (height, width) = crop.data.dim();

        let (mut xmin, mut xmax) = (f32::INFINITY, f32::NEG_INFINITY);
        for &v in crop.cols.iter() {
            xmin = xmin.min(v);
            xmax = xmax.max(v);
        }
        let (mut ymin, mut ymax) = (f32::INFINITY, f32::NEG_INFINITY);
        for &v in crop.rows.iter() {
            ymin = ymin.min(v);
            ymax = ymax.max(v);
        }

        let hor_axis = Array1::linspace(xmin, xmax, width);
        let ver_axis = Array1::linspace(ymin, ymax, height);
        let hor_data = crop
            .data
            .mean_axis(ndarray::Axis(0))
            .unwrap_or_else(|| Array1::zeros(width));
        let ver_data = crop
            .data
            .mean_axis(ndarray::Axis(1))
            .unwrap_or_else(|| Array1::zeros(height));
        let int_data = match crop.data.mean() {
            Some(mean) => arr1(&[mean]),
            None => Array1::zeros(0),
        };
        LineoutData::new(hor_axis, hor_data, ver_axis, ver_data, Some(int_data))
    }

    /// Scattered-point reduction: keep the samples the region contains,
    /// sort them by x for the horizontal profile and by y for the vertical
    /// one (the two orderings are independent), and average all contained
    /// values.
    fn get_xydata_spread(
        samples: &Array2<f32>,
        roi: &ShapedRoi,
    ) -> Result<LineoutData, LineoutError> {
        let mut contained: Vec<(f32, f32, f32)> = Vec::new();
        for row in samples.outer_iter() {
            if row.len() >= 3 && roi.contains(row[0], row[1]) {
                contained.push((row[0], row[1], row[2]));
            }
        }

        let mut by_x = contained.clone();
        by_x.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.2.total_cmp(&b.2)));
        let mut by_y = contained.clone();
        by_y.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)));

        let hor_axis: Array1<f32> = by_x.iter().map(|s| s.0).collect();
        let hor_data: Array1<f32> = by_x.iter().map(|s| s.2).collect();
        let ver_axis: Array1<f32> = by_y.iter().map(|s| s.1).collect();
        let ver_data: Array1<f32> = by_y.iter().map(|s| s.2).collect();
        let int_data = if contained.is_empty() {
            Array1::zeros(0)
        } else {
            let sum: f32 = contained.iter().map(|s| s.2).sum();
            arr1(&[sum / contained.len() as f32])
        };
        LineoutData::new(hor_axis, hor_data, ver_axis, ver_data, Some(int_data))
    }
}

impl Filter for Filter2DFromRois {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FilterBase {
        &mut self.base
    }

    fn extract(&mut self, data: &DataBundle) -> Result<Option<LineoutMap>, LineoutError> {
        let rois = self.rois.borrow();
        let settings = self.settings.borrow();
        let mut map = LineoutMap::new();

        for (roi_key, roi) in rois.iter() {
            let index = settings
                .channel_for(roi_key)
                .and_then(|key| self.image_keys.iter().position(|k| k == key))
                .unwrap_or(0);
            let Some(ChannelData::D2(array)) = data.data.get(index) else {
                continue;
            };
            let lineout = match data.distribution {
                Distribution::Uniform => self.get_xydata_uniform(array, roi)?,
                Distribution::Spread => Self::get_xydata_spread(array, roi)?,
            };
            map.insert(roi_key.clone(), lineout);
        }
        Ok(Some(map))
    }
}
