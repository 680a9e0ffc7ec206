//! Data entities delivered by the acquisition source: coordinate axes and
//! labeled multi-channel bundles.

use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

/// Immutable description of one coordinate dimension.
///
/// Axes are created by the data source and only read by the filters; when an
/// extraction crops data to a sub-range, a new axis is derived with
/// [`Axis::sliced`] so label and units carry over.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Axis {
    pub label: String,
    pub units: String,
    /// Monotonic sample values along the dimension.
    pub data: Array1<f32>,
}

impl Axis {
    pub fn new(label: impl Into<String>, units: impl Into<String>, data: Array1<f32>) -> Self {
        Axis {
            label: label.into(),
            units: units.into(),
            data,
        }
    }

    /// Re-derives the axis over the half-open sample range `lo..hi`.
    pub fn sliced(&self, lo: usize, hi: usize) -> Axis {
        Axis {
            label: self.label.clone(),
            units: self.units.clone(),
            data: self.data.slice(s![lo..hi]).to_owned(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// How the samples of a bundle are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distribution {
    /// Data sampled on a regular grid.
    Uniform,
    /// Data as an irregular set of `(x, y, value)` samples.
    Spread,
}

/// One channel of raw data.
///
/// For the `Spread` distribution a channel is an `N x 3` table of
/// `(x, y, value)` rows rather than a regular grid.
#[derive(Clone, Debug)]
pub enum ChannelData {
    D1(Array1<f32>),
    D2(Array2<f32>),
}

impl ChannelData {
    pub fn as_d1(&self) -> Option<&Array1<f32>> {
        match self {
            ChannelData::D1(a) => Some(a),
            ChannelData::D2(_) => None,
        }
    }

    pub fn as_d2(&self) -> Option<&Array2<f32>> {
        match self {
            ChannelData::D1(_) => None,
            ChannelData::D2(a) => Some(a),
        }
    }
}

/// Labeled multi-channel data bundle delivered on each acquisition event.
#[derive(Clone, Debug, Default)]
pub struct DataBundle {
    /// One label per channel, aligned with `data`.
    pub labels: Vec<String>,
    pub data: Vec<ChannelData>,
    pub distribution: Distribution,
    /// Optional descriptor of the primary axis for 1D channels. Filters that
    /// cache an axis overwrite theirs whenever a bundle carries one.
    pub axis: Option<Axis>,
}

impl Default for Distribution {
    fn default() -> Self {
        Distribution::Uniform
    }
}

impl DataBundle {
    pub fn new(distribution: Distribution) -> Self {
        DataBundle {
            labels: Vec::new(),
            data: Vec::new(),
            distribution,
            axis: None,
        }
    }

    /// Appends a labeled channel to the bundle.
    pub fn push_channel(&mut self, label: impl Into<String>, data: ChannelData) {
        self.labels.push(label.into());
        self.data.push(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_axis_sliced_keeps_label_and_units() {
        let axis = Axis::new("time", "ps", arr1(&[0.0, 1.0, 2.0, 3.0]));
        let sub = axis.sliced(1, 3);
        assert_eq!(sub.label, "time");
        assert_eq!(sub.units, "ps");
        assert_eq!(sub.data, arr1(&[1.0, 2.0]));
    }

    #[test]
    fn test_bundle_channels_stay_aligned() {
        let mut bundle = DataBundle::new(Distribution::Uniform);
        bundle.push_channel("red", ChannelData::D1(arr1(&[1.0, 2.0])));
        bundle.push_channel("blue", ChannelData::D1(arr1(&[3.0, 4.0])));
        assert_eq!(bundle.labels, vec!["red", "blue"]);
        assert_eq!(bundle.data.len(), 2);
        assert!(bundle.data[0].as_d1().is_some());
        assert!(bundle.data[0].as_d2().is_none());
    }
}
