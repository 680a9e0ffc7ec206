//! Linear-ROI-driven extraction for 1D channel data.

use crate::data::{Axis, ChannelData, DataBundle};
use crate::filters::filter::{Filter, FilterBase, LineoutMap};
use crate::lineout::{LineoutData, LineoutError};
use crate::math_tools::find_index;
use crate::roi::{LinearRoi, RoiSettings};
use ndarray::{arr1, s, Array1};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Crops every linear region out of its configured channel and reduces the
/// crop to its arithmetic mean.
///
/// Regions and their channel selection are owned and mutated externally;
/// the filter reads the current geometry on each extraction. A region whose
/// configured channel is absent from the bundle falls back to channel 0.
pub struct Filter1DFromRois {
    base: FilterBase,
    rois: Rc<RefCell<BTreeMap<String, LinearRoi>>>,
    settings: Rc<RefCell<RoiSettings>>,
    axis: Option<Axis>,
}

impl Filter1DFromRois {
    pub fn new(
        rois: Rc<RefCell<BTreeMap<String, LinearRoi>>>,
        settings: Rc<RefCell<RoiSettings>>,
    ) -> Self {
        Filter1DFromRois {
            base: FilterBase::new(),
            rois,
            settings,
            axis: None,
        }
    }

    /// Replaces the cached axis (last write wins).
    pub fn update_axis(&mut self, axis: Axis) {
        self.axis = Some(axis);
    }

    /// Crops `data` to the region's matched index range and reduces it.
    ///
    /// The `(min, max)` range maps onto the axis as a half-open index slice.
    /// An empty crop yields an empty-but-valid lineout.
    fn get_data_from_roi(
        axis: &Axis,
        roi: &LinearRoi,
        data: &Array1<f32>,
    ) -> Result<LineoutData, LineoutError> {
        let (xmin, xmax) = roi.range();
        let matched = find_index(&axis.data, &[xmin, xmax]);
        let [(ind_min, _), (ind_max, _)] = matched[..] else {
            return Ok(LineoutData::empty());
        };
        if ind_min >= ind_max || ind_max > data.len() {
            return Ok(LineoutData::empty());
        }

        let cropped = data.slice(s![ind_min..ind_max]).to_owned();
        let cropped_axis = axis.sliced(ind_min, ind_max);
        let int_data = match cropped.mean() {
            Some(mean) => arr1(&[mean]),
            None => Array1::zeros(0),
        };
        LineoutData::horizontal(cropped_axis.data, cropped, int_data)
    }
}

impl Filter for Filter1DFromRois {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FilterBase {
        &mut self.base
    }

    fn extract(&mut self, data: &DataBundle) -> Result<Option<LineoutMap>, LineoutError> {
        if let Some(axis) = &data.axis {
            self.update_axis(axis.clone());
        }
        let axis = match self.axis.as_ref() {
            Some(axis) if !axis.is_empty() => axis,
            _ => return Ok(None),
        };

        let rois = self.rois.borrow();
        let settings = self.settings.borrow();
        let mut map = LineoutMap::new();

        for (roi_key, roi) in rois.iter() {
            // fall back to the first channel when the configured label is absent
            let index = settings
                .channel_for(roi_key)
                .and_then(|label| data.labels.iter().position(|l| l == label))
                .unwrap_or(0);
            let Some(ChannelData::D1(channel)) = data.data.get(index) else {
                continue;
            };
            map.insert(roi_key.clone(), Self::get_data_from_roi(axis, roi, channel)?);
        }
        Ok(Some(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Distribution;
    use approx::assert_relative_eq;

    fn setup(
        rois: BTreeMap<String, LinearRoi>,
        settings: RoiSettings,
    ) -> Filter1DFromRois {
        Filter1DFromRois::new(
            Rc::new(RefCell::new(rois)),
            Rc::new(RefCell::new(settings)),
        )
    }

    fn bundle() -> DataBundle {
        let mut bundle = DataBundle::new(Distribution::Uniform);
        bundle.axis = Some(Axis::new(
            "x",
            "mm",
            arr1(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        ));
        bundle.push_channel(
            "red",
            ChannelData::D1(arr1(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0])),
        );
        bundle.push_channel(
            "blue",
            ChannelData::D1(arr1(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])),
        );
        bundle
    }

    #[test]
    fn test_linear_roi_crops_and_averages() {
        let mut rois = BTreeMap::new();
        rois.insert("ROI_00".to_string(), LinearRoi::new(2.0, 4.0));
        let mut settings = RoiSettings::new();
        settings.set_channel("ROI_00", "red");
        let mut filter = setup(rois, settings);

        let map = filter.extract(&bundle()).unwrap().unwrap();
        let lineout = &map["ROI_00"];
        assert_eq!(lineout.hor_axis, arr1(&[2.0, 3.0]));
        assert_eq!(lineout.hor_data, arr1(&[30.0, 40.0]));
        assert_relative_eq!(lineout.int_data[0], 35.0);
        assert!(lineout.ver_axis.is_empty() && lineout.ver_data.is_empty());
    }

    #[test]
    fn test_missing_channel_falls_back_to_first() {
        let mut rois = BTreeMap::new();
        rois.insert("ROI_00".to_string(), LinearRoi::new(0.0, 2.0));
        let mut settings = RoiSettings::new();
        settings.set_channel("ROI_00", "green");
        let mut filter = setup(rois, settings);

        let map = filter.extract(&bundle()).unwrap().unwrap();
        // "green" is absent, so the "red" channel (index 0) is reduced
        assert_eq!(map["ROI_00"].hor_data, arr1(&[10.0, 20.0]));
    }

    #[test]
    fn test_empty_crop_yields_empty_lineout() {
        let mut rois = BTreeMap::new();
        // region collapsed onto a single sample: half-open crop is empty
        rois.insert("ROI_00".to_string(), LinearRoi::new(3.0, 3.0));
        let mut filter = setup(rois, RoiSettings::new());

        let map = filter.extract(&bundle()).unwrap().unwrap();
        let lineout = &map["ROI_00"];
        assert!(lineout.hor_axis.is_empty());
        assert!(lineout.hor_data.is_empty());
        assert!(lineout.int_data.is_empty());
    }

    #[test]
    fn test_externally_moved_roi_is_read_per_extraction() {
        let rois = Rc::new(RefCell::new(BTreeMap::from([(
            "ROI_00".to_string(),
            LinearRoi::new(0.0, 2.0),
        )])));
        let mut filter = Filter1DFromRois::new(
            Rc::clone(&rois),
            Rc::new(RefCell::new(RoiSettings::new())),
        );

        let map = filter.extract(&bundle()).unwrap().unwrap();
        assert_eq!(map["ROI_00"].hor_data, arr1(&[10.0, 20.0]));

        rois.borrow_mut().insert("ROI_00".to_string(), LinearRoi::new(4.0, 6.0));
        let map = filter.extract(&bundle()).unwrap().unwrap();
        assert_eq!(map["ROI_00"].hor_data, arr1(&[50.0, 60.0]));
    }
}
