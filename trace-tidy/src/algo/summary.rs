use crate::algo::distance::DistanceCovered;
use crate::algo::tidy::{TidyResult, Timestamp};
use geo_types::Coordinate;
use serde::Serialize;
use uom::si::f64::Time;
use uom::si::length::kilometer;
use uom::si::time::{minute, second};

/// how much a trace shrunk by tidying it
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TidySummary {
    pub original_samples: usize,
    pub tidied_samples: usize,

    /// share of the original samples which got dropped
    pub reduction_ratio: f64,
    pub original_distance_km: f64,
    pub tidied_distance_km: f64,
    pub duration_min: f64,
}

impl TidySummary {
    /// expects `result` to be the outcome of tidying `coordinates` and `timestamps`
    pub fn new(
        coordinates: &[Coordinate<f64>],
        timestamps: &[Timestamp],
        result: &TidyResult,
    ) -> Self {
        let reduction_ratio = if coordinates.is_empty() {
            0.0
        } else {
            1.0 - result.len() as f64 / coordinates.len() as f64
        };

        let duration = match (timestamps.first(), timestamps.last()) {
            (Some(first), Some(last)) => {
                Time::new::<second>(last.saturating_sub(*first) as f64)
            }
            _ => Time::new::<second>(0.0),
        };

        Self {
            original_samples: coordinates.len(),
            tidied_samples: result.len(),
            reduction_ratio,
            original_distance_km: coordinates.distance_covered().get::<kilometer>(),
            tidied_distance_km: result
                .tidied_coordinates
                .distance_covered()
                .get::<kilometer>(),
            duration_min: duration.get::<minute>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TidySummary;
    use crate::algo::tidy::{tidy, Thresholds};
    use geo_types::coord;

    #[test]
    fn summary_of_two_blobs() {
        let coords = vec![
            coord!(x: 13.207993, y: 52.446379),
            coord!(x: 13.207994, y: 52.446380),
            coord!(x: 13.207995, y: 52.446381),
            coord!(x: 13.231658, y: 52.465416),
            coord!(x: 13.231659, y: 52.465417),
            coord!(x: 13.231660, y: 52.465417),
        ];
        let tss = vec![
            1477090402, 1477090403, 1477090404, 1477090661, 1477090662, 1477090663,
        ];
        let result = tidy(&coords, &tss, Thresholds::default());
        let summary = TidySummary::new(&coords, &tss, &result);

        assert_eq!(summary.original_samples, 6);
        assert_eq!(summary.tidied_samples, 2);
        assert!((summary.reduction_ratio - 2.0 / 3.0).abs() < 1e-9);
        assert!((summary.duration_min - 261.0 / 60.0).abs() < 1e-9);
        assert!(summary.tidied_distance_km > 2.5 && summary.tidied_distance_km < 2.8);
        assert!(summary.original_distance_km >= summary.tidied_distance_km);
        assert!(summary.original_distance_km - summary.tidied_distance_km < 0.001);
    }

    #[test]
    fn summary_of_empty_trace() {
        let result = tidy(&[], &[], Thresholds::default());
        let summary = TidySummary::new(&[], &[], &result);
        assert_eq!(summary.original_samples, 0);
        assert_eq!(summary.reduction_ratio, 0.0);
        assert_eq!(summary.duration_min, 0.0);
        assert_eq!(summary.original_distance_km, 0.0);
    }

    #[test]
    fn summary_of_extreme_timestamps() {
        let coords = vec![coord!(x: 13.0, y: 52.0), coord!(x: 13.1, y: 52.0)];
        let tss = vec![-9_000_000_000_000_000_000, 9_000_000_000_000_000_000];
        let result = tidy(&coords, &tss, Thresholds::default());
        assert_eq!(result.original_to_tidied, vec![0, 1]);

        let summary = TidySummary::new(&coords, &tss, &result);
        let expected = i64::MAX as f64 / 60.0;
        assert!((summary.duration_min - expected).abs() / expected < 1e-12);
    }
}
