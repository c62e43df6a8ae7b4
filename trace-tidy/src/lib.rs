//! Thinning of dense GPS traces.
//!
//! A trace is a pair of parallel sequences: `[lon, lat]` coordinates and their timestamps in
//! seconds. [`tidy`] drops every sample which does not add enough distance *and* enough elapsed
//! time since the last retained sample, and keeps track of which retained sample each original
//! sample was folded into.

pub mod algo;
pub mod geojson_debug;
pub mod model;

pub use algo::tidy::{
    tidy, tidy_with, try_tidy, try_tidy_with, Thresholds, ThresholdsError, Tidy, TidyError,
    TidyResult, Timestamp,
};
