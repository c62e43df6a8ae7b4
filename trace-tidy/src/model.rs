use crate::algo::{PointInTime, Tidy};
use crate::{Thresholds, TidyResult, Timestamp};
use chrono::{DateTime, Utc};
use geo_types::{Coordinate, Point};
use serde::{Deserialize, Serialize};

/// one line of a JSONL trace file
#[derive(Serialize, Deserialize, Debug)]
pub struct TraceRecord {
    pub lon: f64,
    pub lat: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(PartialEq, Serialize, Deserialize, Clone, Debug)]
#[serde(from = "TraceRecord", into = "TraceRecord")]
pub struct TracePoint {
    pub point: Point<f64>,
    pub timestamp: DateTime<Utc>,
}

impl From<TraceRecord> for TracePoint {
    fn from(record: TraceRecord) -> Self {
        Self {
            point: Point::new(record.lon, record.lat),
            timestamp: record.timestamp,
        }
    }
}

impl From<TracePoint> for TraceRecord {
    fn from(tp: TracePoint) -> Self {
        Self {
            lon: tp.point.x(),
            lat: tp.point.y(),
            timestamp: tp.timestamp,
        }
    }
}

impl From<TracePoint> for Coordinate<f64> {
    fn from(tp: TracePoint) -> Self {
        tp.point.0
    }
}

impl PointInTime for TracePoint {
    #[inline]
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    fn point(&self) -> Point<f64> {
        self.point
    }
}

pub struct Trace {
    pub name: String,

    /// chronologically sorted points
    pub points: Vec<TracePoint>,
}

impl Trace {
    pub fn coordinates(&self) -> Vec<Coordinate<f64>> {
        self.points.iter().cloned().map(Coordinate::from).collect()
    }

    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.points.iter().map(|tp| tp.timestamp.timestamp()).collect()
    }

    /// expects the points to be sorted chronologically
    pub fn tidy(&self, thresholds: Thresholds) -> TidyResult {
        self.points.tidy(thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::{Trace, TracePoint};
    use crate::Thresholds;
    use chrono::{TimeZone, Utc};
    use geo_types::{Coordinate, Point};
    use std::fs::File;
    use std::io::{BufRead, BufReader};

    #[test]
    fn parse_trace_record() {
        let tp: TracePoint = serde_json::from_str(
            r#"{"lon": 13.207993, "lat": 52.446379, "timestamp": "2016-10-21T22:53:22Z"}"#,
        )
        .unwrap();
        assert_eq!(tp.point, Point::new(13.207993, 52.446379));
        assert_eq!(tp.timestamp, Utc.timestamp_opt(1477090402, 0).unwrap());
    }

    #[test]
    fn serialize_trace_point() {
        let tp = TracePoint {
            point: Point::new(13.0, 52.0),
            timestamp: Utc.timestamp_opt(1477090402, 0).unwrap(),
        };
        let value = serde_json::to_value(&tp).unwrap();
        assert_eq!(value["lon"], 13.0);
        assert_eq!(value["lat"], 52.0);
        assert_eq!(value["timestamp"], "2016-10-21T22:53:22Z");
    }

    #[test]
    fn trace_parallel_sequences() {
        let trace = Trace {
            name: "test".to_string(),
            points: vec![
                TracePoint {
                    point: Point::new(13.207993, 52.446379),
                    timestamp: Utc.timestamp_opt(1477090402, 0).unwrap(),
                },
                TracePoint {
                    point: Point::new(13.231658, 52.465416),
                    timestamp: Utc.timestamp_opt(1477090663, 0).unwrap(),
                },
            ],
        };
        assert_eq!(trace.timestamps(), vec![1477090402, 1477090663]);
        assert_eq!(trace.coordinates()[1].x, 13.231658);
        assert_eq!(trace.coordinates()[0], Coordinate::from(trace.points[0].clone()));

        let result = trace.tidy(Thresholds::default());
        assert_eq!(result.original_to_tidied, vec![0, 1]);
    }

    #[test]
    fn tidy_trace_file() {
        let file = File::open(format!(
            "{}/../data/two_blobs.jsonl",
            env!("CARGO_MANIFEST_DIR")
        ))
        .unwrap();
        let points = BufReader::new(file)
            .lines()
            .map(|line| serde_json::from_str::<TracePoint>(&line.unwrap()).unwrap())
            .collect::<Vec<_>>();
        let trace = Trace {
            name: "two_blobs".to_string(),
            points,
        };
        assert_eq!(trace.timestamps()[3], 1477090661);

        let result = trace.tidy(Thresholds::default());
        assert_eq!(result.original_to_tidied, vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(result.tidied_coordinates[1], trace.coordinates()[3]);
    }
}
