//! Region-driven lineout extraction and interactive Fourier filtering for
//! multi-dimensional instrument data.
//!
//! The crate connects graphical regions (crosshairs, linear regions, shaped
//! regions) to the data displayed underneath them. Each filter observes one
//! region kind, reduces the data bundles it is fed to per-channel or
//! per-region lineouts, and pushes the results to a registered target slot.
//! Region geometry stays owned by the display layer; filters only read it.
//!
//! Data arrives as [`data::DataBundle`]s: labeled 1D or 2D channels sharing
//! one distribution (sampled on a uniform grid, or scattered points carrying
//! their own coordinates). Results leave as [`lineout::LineoutData`]:
//! horizontal and vertical profiles plus an integrated scalar.
//!
//! The [`filters::FourierFilterer`] stands apart from the bundle-driven
//! filters: it band-passes a single 1D signal through a Gaussian spectral
//! window and reports the dominant frequency and phase.

pub mod data;
pub mod filters;
pub mod graph_item;
pub mod lineout;
pub mod math_tools;
pub mod roi;
