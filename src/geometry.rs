//! Planar lat/lng geometry for route arcs.
//!
//! Everything here works on raw degrees in a flat plane: distances are
//! `sqrt(dLat² + dLng²)` and midpoints are plain averages. No geodesic
//! correction is applied anywhere.

use crate::constants::{
    ANTIMERIDIAN_SHIFT, CURVE_SEGMENTS, LONG_ARC_FLATTEN_RADIANS, SLOPE_EPSILON,
};
use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
///
/// Latitude stays within [-90, 90]. Longitude is unconstrained so that an
/// endpoint can be shifted by -360 to sit next to its partner across the
/// antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Same latitude, longitude moved one full turn west
    #[must_use]
    pub fn shifted_west(self) -> Self {
        Self::new(self.lat, self.lng - ANTIMERIDIAN_SHIFT)
    }
}

/// Endpoints of a route after antimeridian resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPath {
    pub from: LatLng,
    pub to: LatLng,
    /// `from` had its longitude shifted by -360
    pub from_shifted: bool,
    /// `to` had its longitude shifted by -360
    pub to_shifted: bool,
}

/// Resolved shape of one arc, as handed to the rendering host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ArcShape {
    /// Straight segment (or any polyline)
    Polyline { vertices: Vec<LatLng> },
    /// Quadratic Bezier from `from` to `to` bent towards `control`
    Curve {
        from: LatLng,
        control: LatLng,
        to: LatLng,
    },
}

impl ArcShape {
    #[must_use]
    pub fn straight(from: LatLng, to: LatLng) -> Self {
        Self::Polyline {
            vertices: vec![from, to],
        }
    }

    /// Curved arc between two points, or a straight segment when the
    /// control point is degenerate.
    #[must_use]
    pub fn curved(from: LatLng, to: LatLng) -> Self {
        let mid = midpoint(from, to);
        match curve_control_point(from, to, mid) {
            Some(control) => Self::Curve { from, control, to },
            None => Self::straight(from, to),
        }
    }

    #[must_use]
    pub fn endpoints(&self) -> Option<(LatLng, LatLng)> {
        match self {
            Self::Polyline { vertices } => Some((*vertices.first()?, *vertices.last()?)),
            Self::Curve { from, to, .. } => Some((*from, *to)),
        }
    }

    /// Vertices of the shape; curves are flattened into `CURVE_SEGMENTS` pieces
    #[must_use]
    pub fn polyline_vertices(&self) -> Vec<LatLng> {
        match self {
            Self::Polyline { vertices } => vertices.clone(),
            Self::Curve { from, control, to } => {
                sample_quadratic(*from, *control, *to, CURVE_SEGMENTS)
            }
        }
    }

    #[must_use]
    pub fn is_curve(&self) -> bool {
        matches!(self, Self::Curve { .. })
    }
}

/// Planar distance in degrees
#[must_use]
pub fn planar_distance(a: LatLng, b: LatLng) -> f64 {
    let d_lat = b.lat - a.lat;
    let d_lng = b.lng - a.lng;
    (d_lat * d_lat + d_lng * d_lng).sqrt()
}

/// Planar midpoint (simple average, not spherical)
#[must_use]
pub fn midpoint(a: LatLng, b: LatLng) -> LatLng {
    LatLng::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0)
}

/// Picks the shortest of the four longitude pairings between two endpoints.
///
/// Candidates are tried in the order (from, to), (from-360, to),
/// (from, to-360), (from-360, to-360); a later candidate only wins when it is
/// strictly shorter. The double shift is rejected when both shifted
/// longitudes fall below -180.
///
/// Returns `None` when any coordinate is missing; the caller skips the row.
#[must_use]
pub fn resolve_shortest_path(
    from_lat: Option<f64>,
    from_lng: Option<f64>,
    to_lat: Option<f64>,
    to_lng: Option<f64>,
) -> Option<ResolvedPath> {
    let from = LatLng::new(from_lat?, from_lng?);
    let to = LatLng::new(to_lat?, to_lng?);
    let from_west = from.shifted_west();
    let to_west = to.shifted_west();

    let mut best = ResolvedPath {
        from,
        to,
        from_shifted: false,
        to_shifted: false,
    };
    let mut min_distance = planar_distance(from, to);

    let from_shifted = planar_distance(from_west, to);
    if from_shifted < min_distance {
        min_distance = from_shifted;
        best = ResolvedPath {
            from: from_west,
            to,
            from_shifted: true,
            to_shifted: false,
        };
    }

    let to_shifted = planar_distance(from, to_west);
    if to_shifted < min_distance {
        min_distance = to_shifted;
        best = ResolvedPath {
            from,
            to: to_west,
            from_shifted: false,
            to_shifted: true,
        };
    }

    let both_shifted = planar_distance(from_west, to_west);
    let double_wrap = from_west.lng < -180.0 && to_west.lng < -180.0;
    if both_shifted < min_distance && !double_wrap {
        best = ResolvedPath {
            from: from_west,
            to: to_west,
            from_shifted: true,
            to_shifted: true,
        };
    }

    Some(best)
}

/// Both roots of `a·x² + b·x + c = 0`, smaller first.
///
/// `None` when `a` vanishes, the discriminant is negative, or the roots are
/// not finite.
#[must_use]
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a.abs() < SLOPE_EPSILON {
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || !discriminant.is_finite() {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let r1 = (-b - sqrt_d) / (2.0 * a);
    let r2 = (-b + sqrt_d) / (2.0 * a);
    if !r1.is_finite() || !r2.is_finite() {
        return None;
    }

    Some((r1.min(r2), r1.max(r2)))
}

/// Latitudes where the line `lng = slope·(lat - center.lat) + center.lng`
/// crosses the circle of `radius` around `center`.
fn line_circle_latitudes(slope: f64, center: LatLng, radius: f64) -> Option<(f64, f64)> {
    let x0 = center.lat;
    let y0 = center.lng;
    let k2 = -slope * x0 + y0;

    let a = slope * slope + 1.0;
    let b = 2.0 * slope * k2 - 2.0 * x0 - 2.0 * slope * y0;
    let c = x0 * x0 + k2 * k2 - 2.0 * y0 * k2 + y0 * y0 - radius * radius;

    quadratic_roots(a, b, c)
}

/// Control point for a quadratic Bezier arc between `from` and `to`.
///
/// The point lies on the perpendicular bisector through `midpoint`, at the
/// midpoint-to-endpoint distance (halved for long arcs). Of the two
/// candidates, the larger latitude is taken when both endpoints are in the
/// northern hemisphere, the smaller one otherwise. That choice is a
/// best-effort heuristic; routes between hemispheres can bulge to the less
/// natural side.
///
/// Returns `None` for the degenerate cases where the caller should draw a
/// straight line instead: equal latitudes (undefined slope), equal
/// longitudes (vertical bisector), coincident endpoints, or any non-finite
/// intermediate.
#[must_use]
pub fn curve_control_point(from: LatLng, to: LatLng, midpoint: LatLng) -> Option<LatLng> {
    let d_lat = to.lat - from.lat;
    let d_lng = to.lng - from.lng;

    // ang1 = d_lng / d_lat and ang2 = -1 / ang1 both need a non-zero denominator
    if d_lat.abs() < SLOPE_EPSILON || d_lng.abs() < SLOPE_EPSILON {
        return None;
    }
    let perpendicular = -d_lat / d_lng;

    let mut distance = planar_distance(to, midpoint);
    if distance < SLOPE_EPSILON || !distance.is_finite() {
        return None;
    }
    if distance.to_radians() > LONG_ARC_FLATTEN_RADIANS {
        distance /= 2.0;
    }

    let (lower, upper) = line_circle_latitudes(perpendicular, midpoint, distance)?;
    let lat = if from.lat > 0.0 && to.lat > 0.0 {
        upper
    } else {
        lower
    };
    let lng = perpendicular * (lat - midpoint.lat) + midpoint.lng;

    if lat.is_finite() && lng.is_finite() {
        Some(LatLng::new(lat, lng))
    } else {
        None
    }
}

/// Flattens a quadratic Bezier into `segments + 1` vertices.
#[must_use]
pub fn sample_quadratic(from: LatLng, control: LatLng, to: LatLng, segments: usize) -> Vec<LatLng> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / segments as f64;
            let u = 1.0 - t;
            LatLng::new(
                u * u * from.lat + 2.0 * u * t * control.lat + t * t * to.lat,
                u * u * from.lng + 2.0 * u * t * control.lng + t * t * to.lng,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_resolve_missing_coordinate() {
        assert!(resolve_shortest_path(None, Some(1.0), Some(2.0), Some(3.0)).is_none());
        assert!(resolve_shortest_path(Some(1.0), Some(1.0), Some(2.0), None).is_none());
    }

    #[test]
    fn test_resolve_keeps_short_routes_unshifted() {
        let path = resolve_shortest_path(Some(34.0), Some(-118.0), Some(40.6), Some(-73.8))
            .expect("complete row");
        assert!(!path.from_shifted);
        assert!(!path.to_shifted);
        assert_eq!(path.from, LatLng::new(34.0, -118.0));
        assert_eq!(path.to, LatLng::new(40.6, -73.8));
    }

    #[test]
    fn test_resolve_shifts_from_across_antimeridian() {
        // Tokyo -> Los Angeles is shorter going east across the antimeridian
        let path = resolve_shortest_path(Some(35.5), Some(139.8), Some(33.9), Some(-118.4))
            .expect("complete row");
        assert!(path.from_shifted);
        assert!(!path.to_shifted);
        assert_close(path.from.lng, 139.8 - 360.0);
        assert_close(path.to.lng, -118.4);
    }

    #[test]
    fn test_resolve_shifts_to_across_antimeridian() {
        let path = resolve_shortest_path(Some(33.9), Some(-118.4), Some(35.5), Some(139.8))
            .expect("complete row");
        assert!(!path.from_shifted);
        assert!(path.to_shifted);
        assert_close(path.to.lng, 139.8 - 360.0);
    }

    #[test]
    fn test_resolve_picks_minimum_candidate() {
        let inputs = [
            (10.0, 170.0, -20.0, -175.0),
            (-45.0, 0.0, 45.0, 179.0),
            (0.0, -179.0, 0.0, 179.0),
            (60.0, 90.0, 50.0, -90.0),
        ];
        for (fl, fg, tl, tg) in inputs {
            let path = resolve_shortest_path(Some(fl), Some(fg), Some(tl), Some(tg))
                .expect("complete row");
            let chosen = planar_distance(path.from, path.to);
            let from = LatLng::new(fl, fg);
            let to = LatLng::new(tl, tg);
            let candidates = [
                planar_distance(from, to),
                planar_distance(from.shifted_west(), to),
                planar_distance(from, to.shifted_west()),
            ];
            for candidate in candidates {
                assert!(chosen <= candidate + 1e-9);
            }
        }
    }

    #[test]
    fn test_resolve_small_longitude_gap_is_unshifted() {
        for (fg, tg) in [(-170.0, -10.0), (0.0, 179.0), (120.0, -50.0)] {
            let path = resolve_shortest_path(Some(5.0), Some(fg), Some(-5.0), Some(tg))
                .expect("complete row");
            assert!(!path.from_shifted && !path.to_shifted, "{fg} -> {tg}");
        }
    }

    #[test]
    fn test_equal_latitude_falls_back_to_straight() {
        let from = LatLng::new(10.0, 10.0);
        let to = LatLng::new(10.0, 50.0);
        assert!(curve_control_point(from, to, midpoint(from, to)).is_none());
        assert_eq!(ArcShape::curved(from, to), ArcShape::straight(from, to));
    }

    #[test]
    fn test_equal_longitude_falls_back_to_straight() {
        let from = LatLng::new(-10.0, 20.0);
        let to = LatLng::new(30.0, 20.0);
        assert!(curve_control_point(from, to, midpoint(from, to)).is_none());
    }

    #[test]
    fn test_coincident_endpoints_fall_back_to_straight() {
        let p = LatLng::new(12.0, 34.0);
        assert!(!ArcShape::curved(p, p).is_curve());
    }

    #[test]
    fn test_control_point_is_on_bisector() {
        let from = LatLng::new(10.0, 10.0);
        let to = LatLng::new(20.0, 30.0);
        let mid = midpoint(from, to);
        let control = curve_control_point(from, to, mid).expect("regular geometry");

        // Equidistant from both endpoints
        assert_close(planar_distance(control, from), planar_distance(control, to));

        // Short arc: offset from the midpoint equals the half length
        assert_close(planar_distance(control, mid), planar_distance(to, mid));

        // Both endpoints north of the equator: larger latitude root
        assert!(control.lat > mid.lat);
    }

    #[test]
    fn test_southern_route_takes_smaller_root() {
        let from = LatLng::new(-10.0, 10.0);
        let to = LatLng::new(-20.0, 30.0);
        let mid = midpoint(from, to);
        let control = curve_control_point(from, to, mid).expect("regular geometry");
        assert!(control.lat < mid.lat);
    }

    #[test]
    fn test_long_arc_is_flattened() {
        let from = LatLng::new(10.0, -100.0);
        let to = LatLng::new(50.0, 20.0);
        let mid = midpoint(from, to);
        let half_length = planar_distance(to, mid);
        assert!(half_length.to_radians() > LONG_ARC_FLATTEN_RADIANS);

        let control = curve_control_point(from, to, mid).expect("regular geometry");
        assert_close(planar_distance(control, mid), half_length / 2.0);
    }

    #[test]
    fn test_quadratic_roots_order_and_guards() {
        let (r1, r2) = quadratic_roots(1.0, -3.0, 2.0).expect("two roots");
        assert_close(r1, 1.0);
        assert_close(r2, 2.0);

        assert!(quadratic_roots(0.0, 1.0, 1.0).is_none());
        assert!(quadratic_roots(1.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_sample_quadratic_hits_endpoints() {
        let from = LatLng::new(0.0, 0.0);
        let control = LatLng::new(10.0, 5.0);
        let to = LatLng::new(0.0, 10.0);
        let points = sample_quadratic(from, control, to, 4);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], from);
        assert_eq!(points[4], to);
        // t = 0.5 lies halfway between the chord midpoint and the control point
        assert_close(points[2].lat, 5.0);
        assert_close(points[2].lng, 5.0);
    }

    #[test]
    fn test_polyline_vertices_of_straight_shape() {
        let shape = ArcShape::straight(LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0));
        assert_eq!(shape.polyline_vertices().len(), 2);
        assert_eq!(
            shape.endpoints(),
            Some((LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0)))
        );
    }
}
