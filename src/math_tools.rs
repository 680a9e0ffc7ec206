//! Numerical helpers shared by the lineout filters: nearest-sample lookup on
//! coordinate axes and the Gaussian weighting used by the Fourier filterer.

use ndarray::Array1;

/// Finds, for each target value, the axis sample nearest to it.
///
/// The axis does not have to be sorted; the lookup is a linear scan over the
/// absolute distances, so it works on monotonic and arbitrary axes alike.
/// Ties are broken by the first occurrence.
///
/// Applying this to the `(min, max)` range of a linear region yields the
/// half-open index slice used for cropping.
///
/// # Arguments
/// - `axis`: The axis samples to search.
/// - `targets`: The coordinate values to locate.
///
/// # Returns
/// One `(index, matched_value)` pair per target. An empty axis yields an
/// empty result regardless of the targets.
pub fn find_index(axis: &Array1<f32>, targets: &[f32]) -> Vec<(usize, f32)> {
    if axis.is_empty() {
        return Vec::new();
    }
    targets
        .iter()
        .map(|&target| {
            let mut best = 0usize;
            let mut best_dist = f32::INFINITY;
            for (i, &v) in axis.iter().enumerate() {
                let dist = (v - target).abs();
                if dist < best_dist {
                    best_dist = dist;
                    best = i;
                }
            }
            (best, axis[best])
        })
        .collect()
}

/// Gaussian weighting over `x`, centered at `x0` with full width at half
/// maximum `width`.
///
/// The peak value is `1.0` at `x0` and the weighting falls to `0.5` at
/// `x0 ± width / 2`. The caller must guarantee `width > 0`.
pub fn gauss1d(x: &Array1<f32>, x0: f32, width: f32) -> Array1<f32> {
    let ln2 = std::f32::consts::LN_2;
    x.mapv(|v| {
        let u = (v - x0) / width;
        (-4.0 * ln2 * u * u).exp()
    })
}
