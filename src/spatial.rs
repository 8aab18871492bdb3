//! Distance calculations and nearest-neighbor search.
//!
//! Distances are great-circle meters from the haversine formula (spherical
//! earth, mean radius). That is accurate enough for ranking stations by
//! proximity, which is the only thing this engine uses distance for; no
//! ellipsoidal correction is applied.

use geo::{Distance, Haversine, Point};

/// Great-circle distance between two points, in meters.
///
/// # Examples
///
/// ```rust
/// use geodispatch::spatial::haversine_distance;
/// use geo::Point;
///
/// let athens = Point::new(23.7275, 37.9838);
/// let thessaloniki = Point::new(22.9444, 40.6401);
/// let distance = haversine_distance(&athens, &thessaloniki);
/// assert!(distance > 290_000.0 && distance < 310_000.0); // ~300 km
/// ```
pub fn haversine_distance(a: &Point<f64>, b: &Point<f64>) -> f64 {
    Haversine.distance(*a, *b)
}

/// Find the candidate nearest to `center` by haversine distance.
///
/// This is a brute-force scan: the candidate sets here are station lists
/// (tens of entries), far below the point where an index would pay off.
/// Returns the candidate's position in the slice together with its distance
/// in meters, or `None` for an empty slice. Ties on the minimum distance are
/// broken by the first-encountered candidate.
///
/// # Examples
///
/// ```rust
/// use geodispatch::spatial::find_nearest;
/// use geo::Point;
///
/// let center = Point::new(23.7275, 37.9838);
/// let candidates = vec![
///     (Point::new(23.73, 37.98), "close"),
///     (Point::new(22.94, 40.64), "far"),
/// ];
/// let (index, _distance) = find_nearest(&center, &candidates).unwrap();
/// assert_eq!(candidates[index].1, "close");
/// ```
pub fn find_nearest<T>(center: &Point<f64>, candidates: &[(Point<f64>, T)]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, (location, _)) in candidates.iter().enumerate() {
        let distance = haversine_distance(center, location);
        match best {
            // Strict comparison keeps the first-encountered candidate on ties.
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // Paris to London is roughly 344 km.
        let paris = Point::new(2.3522, 48.8566);
        let london = Point::new(-0.1276, 51.5074);
        let distance = haversine_distance(&paris, &london);
        assert!(
            distance > 339_000.0 && distance < 349_000.0,
            "Paris-London distance {distance} should be ~344km"
        );
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let p = Point::new(23.7275, 37.9838);
        assert!(haversine_distance(&p, &p) < 0.001);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = Point::new(23.7275, 37.9838);
        let b = Point::new(22.9444, 40.6401);
        let forward = haversine_distance(&a, &b);
        let backward = haversine_distance(&b, &a);
        assert!((forward - backward).abs() < 1e-6);
    }

    #[test]
    fn test_find_nearest_picks_minimum() {
        let query = Point::new(23.7275, 37.9838);
        // Roughly 1 km, 5 km and 10 km north of the query point.
        let candidates = vec![
            (Point::new(23.7275, 38.0738), "10km"),
            (Point::new(23.7275, 37.9928), "1km"),
            (Point::new(23.7275, 38.0288), "5km"),
        ];

        let (index, distance) = find_nearest(&query, &candidates).unwrap();
        assert_eq!(candidates[index].1, "1km");
        assert!(distance > 900.0 && distance < 1_100.0);
    }

    #[test]
    fn test_find_nearest_empty_is_none() {
        let query = Point::new(0.0, 0.0);
        let candidates: Vec<(Point<f64>, ())> = vec![];
        assert!(find_nearest(&query, &candidates).is_none());
    }

    #[test]
    fn test_find_nearest_tie_keeps_first() {
        let query = Point::new(0.0, 0.0);
        // Symmetric east/west candidates at identical distance.
        let candidates = vec![
            (Point::new(0.1, 0.0), "east"),
            (Point::new(-0.1, 0.0), "west"),
        ];
        let (index, _) = find_nearest(&query, &candidates).unwrap();
        assert_eq!(candidates[index].1, "east");
    }

    #[test]
    fn test_find_nearest_single_candidate() {
        let query = Point::new(23.7275, 37.9838);
        // Absurdly far candidate still wins when it is the only one.
        let candidates = vec![(Point::new(-74.0060, 40.7128), "nyc")];
        let (index, distance) = find_nearest(&query, &candidates).unwrap();
        assert_eq!(index, 0);
        assert!(distance > 7_000_000.0);
    }
}
