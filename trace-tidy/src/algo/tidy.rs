use crate::algo::distance::haversine_distance;
use crate::algo::PointInTime;
use geo_types::Coordinate;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// seconds
pub type Timestamp = i64;

pub const DEFAULT_DISTANCE_IN_METERS: f64 = 15.0;
pub const DEFAULT_DURATION_IN_SECONDS: i64 = 5;

/// Minimum distance and elapsed time a sample has to add to the last retained sample
/// before it gets retained itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub distance_in_meters: f64,
    pub duration_in_seconds: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            distance_in_meters: DEFAULT_DISTANCE_IN_METERS,
            duration_in_seconds: DEFAULT_DURATION_IN_SECONDS,
        }
    }
}

impl Thresholds {
    /// replaces the fields for which an override is given
    pub fn with_overrides(
        self,
        distance_in_meters: Option<f64>,
        duration_in_seconds: Option<i64>,
    ) -> Self {
        Self {
            distance_in_meters: distance_in_meters.unwrap_or(self.distance_in_meters),
            duration_in_seconds: duration_in_seconds.unwrap_or(self.duration_in_seconds),
        }
    }

    /// rejects negative thresholds and a NaN distance, which would never be met
    pub fn validate(self) -> Result<Self, ThresholdsError> {
        if !(self.distance_in_meters >= 0.0) {
            return Err(ThresholdsError::InvalidDistance(self.distance_in_meters));
        }
        if self.duration_in_seconds < 0 {
            return Err(ThresholdsError::NegativeDuration(self.duration_in_seconds));
        }
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum ThresholdsError {
    #[error("distance threshold must be a non-negative number of meters, got {0}")]
    InvalidDistance(f64),

    #[error("duration threshold must not be negative, got {0} seconds")]
    NegativeDuration(i64),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TidyResult {
    pub tidied_coordinates: Vec<Coordinate<f64>>,
    pub tidied_timestamps: Vec<Timestamp>,

    /// for each original sample the index of the tidied sample it was folded into
    pub original_to_tidied: Vec<usize>,
}

impl TidyResult {
    /// number of retained samples
    pub fn len(&self) -> usize {
        self.tidied_coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tidied_coordinates.is_empty()
    }

    pub fn tidied_index_of(&self, original_index: usize) -> Option<usize> {
        self.original_to_tidied.get(original_index).copied()
    }

    /// number of original samples folded into each retained sample
    pub fn folded_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.len()];
        for &tidied_index in self.original_to_tidied.iter() {
            counts[tidied_index] += 1;
        }
        counts
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TidyError {
    #[error("trace has {coordinates} coordinates but {timestamps} timestamps")]
    LengthMismatch {
        coordinates: usize,
        timestamps: usize,
    },

    #[error("timestamp {current} at position {index} precedes its predecessor {previous}")]
    DecreasingTimestamp {
        index: usize,
        previous: Timestamp,
        current: Timestamp,
    },

    #[error("distance towards position {index} is negative or not a number")]
    InvalidDistance { index: usize },
}

/// distance and time not yet accounted for by a retained sample
#[derive(Debug, Clone, Copy, Default)]
struct Running {
    distance_in_meters: f64,
    duration_in_seconds: i64,
}

impl Running {
    /// Adds the deltas towards the candidate. Returns the accumulator to continue with and
    /// whether the candidate is to be retained.
    fn advance(self, distance_delta: f64, duration_delta: i64, cfg: &Thresholds) -> (Self, bool) {
        let running = Self {
            distance_in_meters: self.distance_in_meters + distance_delta,
            duration_in_seconds: self.duration_in_seconds.saturating_add(duration_delta),
        };

        // both thresholds have to be met, not just one of them
        if running.distance_in_meters >= cfg.distance_in_meters
            && running.duration_in_seconds >= cfg.duration_in_seconds
        {
            (Self::default(), true)
        } else {
            (running, false)
        }
    }
}

/// Grows the tidied sequences and the mapping in lock-step.
struct Builder {
    result: TidyResult,
}

impl Builder {
    fn with_capacity(n: usize) -> Self {
        // expected tidying ratio
        let estimate = n * 3 / 4;
        Self {
            result: TidyResult {
                tidied_coordinates: Vec::with_capacity(estimate),
                tidied_timestamps: Vec::with_capacity(estimate),
                original_to_tidied: Vec::with_capacity(n),
            },
        }
    }

    fn retain(&mut self, coordinate: Coordinate<f64>, timestamp: Timestamp) {
        self.result.tidied_coordinates.push(coordinate);
        self.result.tidied_timestamps.push(timestamp);
        self.fold();
    }

    /// maps the current sample onto the last retained one
    fn fold(&mut self) {
        let at = self.result.tidied_coordinates.len() - 1;
        self.result.original_to_tidied.push(at);
    }

    fn finish(self) -> TidyResult {
        self.result
    }
}

/// Tidies a trace using the haversine distance.
///
/// # Panics
///
/// when `coordinates` and `timestamps` differ in length, or when the timestamps are not
/// sorted in non-decreasing order. Use [`try_tidy`] to get these reported as errors.
pub fn tidy(
    coordinates: &[Coordinate<f64>],
    timestamps: &[Timestamp],
    thresholds: Thresholds,
) -> TidyResult {
    tidy_with(coordinates, timestamps, thresholds, haversine_distance)
}

/// Same as [`tidy`] with a custom distance function returning meters.
///
/// # Panics
///
/// see [`tidy`]. Additionally when `distance` returns a negative value or NaN.
pub fn tidy_with<D>(
    coordinates: &[Coordinate<f64>],
    timestamps: &[Timestamp],
    thresholds: Thresholds,
    distance: D,
) -> TidyResult
where
    D: Fn(Coordinate<f64>, Coordinate<f64>) -> f64,
{
    match try_tidy_with(coordinates, timestamps, thresholds, distance) {
        Ok(result) => result,
        Err(e) => panic!("can not tidy trace: {}", e),
    }
}

pub fn try_tidy(
    coordinates: &[Coordinate<f64>],
    timestamps: &[Timestamp],
    thresholds: Thresholds,
) -> Result<TidyResult, TidyError> {
    try_tidy_with(coordinates, timestamps, thresholds, haversine_distance)
}

/// Single forward pass over adjacent samples `(lhs, rhs)`, with `rhs` being the candidate to
/// retain or to fold into the last retained sample. The first sample is always retained.
///
/// An empty `coordinates` or `timestamps` slice yields an empty result, regardless of the
/// length of the other one.
pub fn try_tidy_with<D>(
    coordinates: &[Coordinate<f64>],
    timestamps: &[Timestamp],
    thresholds: Thresholds,
    distance: D,
) -> Result<TidyResult, TidyError>
where
    D: Fn(Coordinate<f64>, Coordinate<f64>) -> f64,
{
    if coordinates.is_empty() || timestamps.is_empty() {
        return Ok(TidyResult::default());
    }
    if coordinates.len() != timestamps.len() {
        return Err(TidyError::LengthMismatch {
            coordinates: coordinates.len(),
            timestamps: timestamps.len(),
        });
    }

    let mut builder = Builder::with_capacity(coordinates.len());
    builder.retain(coordinates[0], timestamps[0]);

    coordinates
        .windows(2)
        .zip(timestamps.windows(2))
        .enumerate()
        .try_fold(Running::default(), |running, (i, (coords, tss))| {
            let index = i + 1;
            let (lhs_coord, rhs_coord) = (coords[0], coords[1]);
            let (lhs_ts, rhs_ts) = (tss[0], tss[1]);

            let distance_delta = distance(lhs_coord, rhs_coord);
            if !(distance_delta >= 0.0) {
                return Err(TidyError::InvalidDistance { index });
            }
            if rhs_ts < lhs_ts {
                return Err(TidyError::DecreasingTimestamp {
                    index,
                    previous: lhs_ts,
                    current: rhs_ts,
                });
            }
            let duration_delta = rhs_ts.saturating_sub(lhs_ts);

            let (running, keep) = running.advance(distance_delta, duration_delta, &thresholds);
            if keep {
                trace!("retaining sample {}", index);
                builder.retain(rhs_coord, rhs_ts);
            } else {
                builder.fold();
            }
            Ok(running)
        })?;

    let result = builder.finish();

    debug_assert_eq!(result.original_to_tidied.len(), coordinates.len());
    debug_assert_eq!(result.tidied_coordinates.len(), result.tidied_timestamps.len());
    debug_assert!(result
        .original_to_tidied
        .windows(2)
        .all(|window| window[0] <= window[1]));

    debug!(
        "tidied trace of {} samples to {} samples",
        coordinates.len(),
        result.len()
    );
    Ok(result)
}

/// tidying of slices of timestamped points
pub trait Tidy {
    fn tidy(&self, thresholds: Thresholds) -> TidyResult;
}

impl<PIT> Tidy for [PIT]
where
    PIT: PointInTime,
{
    /// # Panics
    ///
    /// when the points are not sorted chronologically
    fn tidy(&self, thresholds: Thresholds) -> TidyResult {
        let coordinates: Vec<_> = self.iter().map(|pit| pit.point().0).collect();
        let timestamps: Vec<_> = self.iter().map(|pit| pit.timestamp().timestamp()).collect();
        tidy(&coordinates, &timestamps, thresholds)
    }
}
