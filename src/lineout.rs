//! Reduced lineout profiles: axis-aligned marginals plus an integrated
//! scalar, produced fresh on every extraction and owned by the consumer.

use ndarray::{arr1, Array1};
use thiserror::Error;

/// Errors raised while assembling a [`LineoutData`].
#[derive(Debug, Error, PartialEq)]
pub enum LineoutError {
    /// An axis and its paired data differ in length. This is never recovered
    /// silently; the extraction that assembled the lineout fails here.
    #[error("{side} lineout data and axis must have the same size (axis: {axis_len}, data: {data_len})")]
    LengthMismatch {
        side: &'static str,
        axis_len: usize,
        data_len: usize,
    },
}

/// Horizontal and vertical marginal profiles extracted at a probe point or
/// region, with a single integrated value.
///
/// The horizontal and vertical pairs are length-consistent by construction.
/// For spread-distribution ROI extraction the two profiles are sorted
/// independently by x and by y, so `hor_data[i]` and `ver_data[i]` do not
/// refer to the same underlying sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineoutData {
    pub hor_axis: Array1<f32>,
    pub hor_data: Array1<f32>,
    pub ver_axis: Array1<f32>,
    pub ver_data: Array1<f32>,
    /// Integrated scalar summary, typically of length 1. Empty when a region
    /// selects no data at all.
    pub int_data: Array1<f32>,
}

impl LineoutData {
    /// Builds a lineout, enforcing that each axis matches its data in length.
    ///
    /// When `int_data` is omitted it defaults to the sum of the vertical
    /// profile.
    pub fn new(
        hor_axis: Array1<f32>,
        hor_data: Array1<f32>,
        ver_axis: Array1<f32>,
        ver_data: Array1<f32>,
        int_data: Option<Array1<f32>>,
    ) -> Result<Self, LineoutError> {
        if hor_axis.len() != hor_data.len() {
            return Err(LineoutError::LengthMismatch {
                side: "horizontal",
                axis_len: hor_axis.len(),
                data_len: hor_data.len(),
            });
        }
        if ver_axis.len() != ver_data.len() {
            return Err(LineoutError::LengthMismatch {
                side: "vertical",
                axis_len: ver_axis.len(),
                data_len: ver_data.len(),
            });
        }
        let int_data = int_data.unwrap_or_else(|| arr1(&[ver_data.sum()]));
        Ok(LineoutData {
            hor_axis,
            hor_data,
            ver_axis,
            ver_data,
            int_data,
        })
    }

    /// Horizontal-only lineout, as produced by the 1D ROI filter.
    pub fn horizontal(
        hor_axis: Array1<f32>,
        hor_data: Array1<f32>,
        int_data: Array1<f32>,
    ) -> Result<Self, LineoutError> {
        Self::new(
            hor_axis,
            hor_data,
            Array1::zeros(0),
            Array1::zeros(0),
            Some(int_data),
        )
    }

    /// Probe read-out carrying only an integrated value, no profiles.
    pub fn probe(value: f32) -> Self {
        LineoutData {
            int_data: arr1(&[value]),
            ..Default::default()
        }
    }

    /// Degenerate but valid result for a region with no data intersection.
    pub fn empty() -> Self {
        LineoutData::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_defaults_int_data_to_sum_of_vertical() {
        let lineout = LineoutData::new(
            arr1(&[0.0, 1.0]),
            arr1(&[5.0, 6.0]),
            arr1(&[0.0, 1.0, 2.0]),
            arr1(&[1.0, 2.0, 3.0]),
            None,
        )
        .unwrap();
        assert_eq!(lineout.int_data.len(), 1);
        assert_relative_eq!(lineout.int_data[0], 6.0);
    }

    #[test]
    fn test_new_rejects_horizontal_length_mismatch() {
        let err = LineoutData::new(
            arr1(&[0.0, 1.0, 2.0]),
            arr1(&[5.0, 6.0]),
            Array1::zeros(0),
            Array1::zeros(0),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LineoutError::LengthMismatch {
                side: "horizontal",
                axis_len: 3,
                data_len: 2,
            }
        );
    }

    #[test]
    fn test_new_rejects_vertical_length_mismatch() {
        let err = LineoutData::new(
            Array1::zeros(0),
            Array1::zeros(0),
            arr1(&[0.0]),
            arr1(&[1.0, 2.0]),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LineoutError::LengthMismatch { side: "vertical", .. }
        ));
    }

    #[test]
    fn test_probe_and_empty_are_length_consistent() {
        let probe = LineoutData::probe(4.5);
        assert_eq!(probe.int_data, arr1(&[4.5]));
        assert!(probe.hor_axis.is_empty() && probe.hor_data.is_empty());

        let empty = LineoutData::empty();
        assert!(empty.int_data.is_empty());
        assert_eq!(empty.ver_axis.len(), empty.ver_data.len());
    }
}
