use geo::prelude::HaversineDistance;
use geo_types::{Coordinate, Point};
use uom::si::f64::Length;
use uom::si::length::meter;

/// great-circle distance in meters between two `[lon, lat]` coordinates
#[inline]
pub fn haversine_distance(a: Coordinate<f64>, b: Coordinate<f64>) -> f64 {
    Point::from(a).haversine_distance(&Point::from(b))
}

/// length of the path along a sequence of coordinates
pub trait DistanceCovered {
    fn distance_covered(&self) -> Length;
}

impl DistanceCovered for [Coordinate<f64>] {
    fn distance_covered(&self) -> Length {
        Length::new::<meter>(
            self.windows(2)
                .map(|window| haversine_distance(window[0], window[1]))
                .sum(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{haversine_distance, DistanceCovered};
    use geo_types::{coord, Coordinate};
    use uom::si::length::meter;

    #[test]
    fn identical_coordinates_are_zero_apart() {
        let c = coord!(x: 13.207993, y: 52.446379);
        assert_eq!(haversine_distance(c, c), 0.0);
    }

    #[test]
    fn distance_between_berlin_fixes() {
        let a = coord!(x: 13.207993, y: 52.446379);
        let b = coord!(x: 13.231658, y: 52.465416);
        let d = haversine_distance(a, b);
        assert!(d > 2500.0 && d < 2800.0, "unexpected distance {}", d);
        assert!((d - haversine_distance(b, a)).abs() < 1e-9);
    }

    #[test]
    fn covered_distance_sums_segments() {
        let coords: Vec<Coordinate<f64>> = vec![
            coord!(x: 0.0, y: 0.0),
            coord!(x: 0.0, y: 0.001),
            coord!(x: 0.0, y: 0.002),
        ];
        let total = coords.distance_covered().get::<meter>();
        let direct = haversine_distance(coords[0], coords[2]);
        assert!((total - direct).abs() < 1e-6);
        assert!(coords[..1].distance_covered().get::<meter>() == 0.0);
    }
}
