//! Planar geometry primitives for district boundaries.
//!
//! Everything here operates on raw coordinate degrees. Containment uses the
//! even-odd ray-casting rule and simplification uses Douglas-Peucker; both are
//! deterministic and tolerate degenerate input (rings with fewer than three
//! vertices are never contained and pass through simplification unchanged).

use geo::{Coord, LineString, Point};
use smallvec::{SmallVec, smallvec};

/// Test whether a point lies inside a ring using the even-odd rule.
///
/// A horizontal ray is cast from the point in the +longitude direction and
/// edge crossings are counted; an odd count means the point is inside. The
/// ring is treated as implicitly closed whether or not its first vertex is
/// repeated at the end. Rings with fewer than three distinct vertices never
/// contain anything.
///
/// Points exactly on a vertex or edge get a deterministic (but otherwise
/// unspecified) answer: the same input always yields the same result.
///
/// # Examples
///
/// ```rust
/// use geodispatch::geometry::point_in_ring;
/// use geo::{LineString, Point, coord};
///
/// let square = LineString::new(vec![
///     coord! { x: 0.0, y: 0.0 },
///     coord! { x: 10.0, y: 0.0 },
///     coord! { x: 10.0, y: 10.0 },
///     coord! { x: 0.0, y: 10.0 },
/// ]);
/// assert!(point_in_ring(&Point::new(5.0, 5.0), &square));
/// assert!(!point_in_ring(&Point::new(15.0, 5.0), &square));
/// ```
pub fn point_in_ring(point: &Point<f64>, ring: &LineString<f64>) -> bool {
    let coords = ring.0.as_slice();

    // Ignore a duplicated closing vertex; the loop below closes implicitly.
    let n = if coords.len() > 1 && coords[0] == coords[coords.len() - 1] {
        coords.len() - 1
    } else {
        coords.len()
    };
    if n < 3 {
        return false;
    }

    let (px, py) = (point.x(), point.y());
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (coords[i].x, coords[i].y);
        let (xj, yj) = (coords[j].x, coords[j].y);

        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Distance from a point to a line segment, clamped to the segment endpoints.
///
/// When the projection of the point onto the infinite line falls outside the
/// segment, the distance to the nearest endpoint is returned instead. All
/// values are in coordinate degrees.
pub fn point_to_segment_distance(point: Coord<f64>, start: Coord<f64>, end: Coord<f64>) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        // Degenerate segment: both endpoints coincide.
        return (point.x - start.x).hypot(point.y - start.y);
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / len_sq).clamp(0.0, 1.0);
    let closest_x = start.x + t * dx;
    let closest_y = start.y + t * dy;
    (point.x - closest_x).hypot(point.y - closest_y)
}

/// Simplify a ring with the Douglas-Peucker algorithm.
///
/// The output is a subset of the input vertices in their original order and
/// always retains the first and last vertex. `tolerance` is in coordinate
/// degrees; a segment collapses to its endpoints when no interior vertex is
/// farther than the tolerance from the chord. Ties on the maximum distance
/// are broken by the lowest vertex index, so the result is deterministic.
///
/// Rings with two or fewer vertices are returned unchanged.
///
/// # Examples
///
/// ```rust
/// use geodispatch::geometry::simplify_ring;
/// use geo::{LineString, coord};
///
/// let jagged = LineString::new(vec![
///     coord! { x: 0.0, y: 0.0 },
///     coord! { x: 5.0, y: 0.0001 },
///     coord! { x: 10.0, y: 0.0 },
/// ]);
/// let simplified = simplify_ring(&jagged, 0.01);
/// assert_eq!(simplified.0.len(), 2);
/// ```
pub fn simplify_ring(ring: &LineString<f64>, tolerance: f64) -> LineString<f64> {
    let points = ring.0.as_slice();
    if points.len() <= 2 {
        return ring.clone();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    // Explicit work stack instead of recursion; boundary rings can run to
    // thousands of vertices.
    let mut segments: SmallVec<[(usize, usize); 16]> = smallvec![(0, points.len() - 1)];
    while let Some((first, last)) = segments.pop() {
        if last <= first + 1 {
            continue;
        }

        let mut max_distance = 0.0;
        let mut max_index = None;
        for i in (first + 1)..last {
            let distance = point_to_segment_distance(points[i], points[first], points[last]);
            // Strict comparison keeps the lowest index on ties.
            if distance > max_distance {
                max_distance = distance;
                max_index = Some(i);
            }
        }

        if let Some(index) = max_index
            && max_distance > tolerance
        {
            keep[index] = true;
            segments.push((index, last));
            segments.push((first, index));
        }
    }

    let kept: Vec<Coord<f64>> = points
        .iter()
        .enumerate()
        .filter(|(i, _)| keep[*i])
        .map(|(_, c)| *c)
        .collect();
    LineString::new(kept)
}
