//! Crosshair-driven probe read-out for 1D channel data.

use crate::data::{Axis, DataBundle};
use crate::filters::filter::{Filter, FilterBase, LineoutMap};
use crate::graph_item::PositionSource;
use crate::lineout::{LineoutData, LineoutError};
use crate::math_tools::find_index;
use std::rc::Rc;

/// Reports, for every channel of a 1D bundle, the axis value nearest to the
/// crosshair x position.
///
/// This is a probe read-out rather than a statistical reduction: every
/// channel receives the same matched axis value as its integrated datum,
/// keyed by channel label.
pub struct Filter1DFromCrosshair {
    base: FilterBase,
    crosshair: Rc<dyn PositionSource>,
    axis: Option<Axis>,
}

impl Filter1DFromCrosshair {
    pub fn new(crosshair: Rc<dyn PositionSource>) -> Self {
        Filter1DFromCrosshair {
            base: FilterBase::new(),
            crosshair,
            axis: None,
        }
    }

    /// Replaces the cached axis. Last write wins; bundles carrying an axis
    /// overwrite the cache on every extraction.
    pub fn update_axis(&mut self, axis: Axis) {
        self.axis = Some(axis);
    }
}

impl Filter for Filter1DFromCrosshair {
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

        let (x, _y) = self.crosshair.position();
        let matched = find_index(&axis.data, &[x]);
        let Some(&(_index, axis_val)) = matched.first() else {
            return Ok(None);
        };

        let mut map = LineoutMap::new();
        for (label, _channel) in data.labels.iter().zip(&data.data) {
            map.insert(label.clone(), LineoutData::probe(axis_val));
        }
        Ok(Some(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ChannelData, Distribution};
    use crate::graph_item::Crosshair;
    use ndarray::arr1;

    fn bundle_with_axis() -> DataBundle {
        let mut bundle = DataBundle::new(Distribution::Uniform);
        bundle.axis = Some(Axis::new("time", "s", arr1(&[0.0, 1.0, 2.0, 3.0, 4.0])));
        bundle.push_channel("red", ChannelData::D1(arr1(&[10.0, 11.0, 12.0, 13.0, 14.0])));
        bundle.push_channel("blue", ChannelData::D1(arr1(&[20.0, 21.0, 22.0, 23.0, 24.0])));
        bundle
    }

    #[test]
    fn test_probe_reports_matched_axis_value_per_channel() {
        let crosshair = Rc::new(Crosshair::new(2.4, 0.0));
        let mut filter = Filter1DFromCrosshair::new(crosshair);
        let map = filter.extract(&bundle_with_axis()).unwrap().unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["red"].int_data, arr1(&[2.0]));
        assert_eq!(map["blue"].int_data, arr1(&[2.0]));
    }

    #[test]
    fn test_axis_cache_is_overwritten_by_the_last_bundle() {
        let crosshair = Rc::new(Crosshair::new(100.0, 0.0));
        let mut filter = Filter1DFromCrosshair::new(Rc::clone(&crosshair) as Rc<dyn PositionSource>);
        filter.update_axis(Axis::new("old", "", arr1(&[0.0, 1.0])));

        let map = filter.extract(&bundle_with_axis()).unwrap().unwrap();
        // the bundle axis [0..4] replaced the cached [0, 1]
        assert_eq!(map["red"].int_data, arr1(&[4.0]));
    }

    #[test]
    fn test_no_axis_yields_no_result() {
        let crosshair = Rc::new(Crosshair::new(1.0, 0.0));
        let mut filter = Filter1DFromCrosshair::new(crosshair);
        let mut bundle = bundle_with_axis();
        bundle.axis = None;
        assert!(filter.extract(&bundle).unwrap().is_none());
    }
}
