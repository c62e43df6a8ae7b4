use chrono::{DateTime, Utc};
use geo_types::Point;

pub mod distance;
pub mod summary;
pub mod tidy;
pub mod time;

pub use distance::{haversine_distance, DistanceCovered};
pub use summary::TidySummary;
pub use tidy::Tidy;
pub use time::SortChronologically;

pub trait PointInTime {
    fn timestamp(&self) -> DateTime<Utc>;
    fn point(&self) -> Point<f64>;
}
