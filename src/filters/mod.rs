//! Region-driven data filters.
//!
//! Every filter in this module watches one kind of graphical region (a
//! crosshair, a linear region or a shaped region) and reduces the data
//! flowing through it to lineouts keyed by channel or region name. Filters
//! share a common life cycle through the `Filter` trait: they can be toggled
//! active, bound to a target slot, and fed data bundles.
//!
//! # Filter Implementations
//!
//! * **Crosshair filters**: probe read-outs and full row/column extraction
//!   at a movable point.
//!
//! * **Region-of-interest filters**: crops and statistical reductions over
//!   externally owned region geometry.
//!
//! * **Fourier filterer**: a standalone interactive band-pass over a single
//!   1D signal, driven by two linear regions.

/// Core filter interfaces and shared components.
/// Defines the `Filter` trait, the filter base state and the lineout map
/// delivered to target slots.
pub mod filter;

/// Crosshair probe read-out for 1D channel data.
pub mod crosshair_1d;

/// Crosshair row/column extraction for 2D channel data, for uniform grids
/// and scattered point clouds.
pub mod crosshair_2d;

/// Linear-region crops and means over 1D channel data.
pub mod rois_1d;

/// Shaped-region marginal profiles and means over 2D channel data.
pub mod rois_2d;

/// Interactive Fourier-domain band-pass filtering of a 1D signal.
pub mod fourier;

pub use crosshair_1d::Filter1DFromCrosshair;
pub use crosshair_2d::Filter2DFromCrosshair;
pub use filter::{Filter, FilterBase, LineoutMap, TargetSlot};
pub use fourier::{EstimateSlot, FourierError, FourierFilterer, SpectralEstimate};
pub use rois_1d::Filter1DFromRois;
pub use rois_2d::Filter2DFromRois;
