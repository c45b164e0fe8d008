use super::viewport::{Projection, ScreenPoint};
use crate::models::{LabelsSettings, Markers, RouteGraph};
use serde::{Deserialize, Serialize};

/// Label pinned to the viewport edge for a marker outside the visible area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffMapLabel {
    pub marker_key: String,
    pub screen_point: ScreenPoint,
    pub text: String,
}

/// Where the ray from the centre of a `width` x `height` area towards
/// `target` leaves the area inset by `padding`
#[must_use]
pub fn edge_point(target: ScreenPoint, width: f64, height: f64, padding: f64) -> ScreenPoint {
    let padding = padding.clamp(0.0, width.min(height) / 2.0);
    let center = ScreenPoint::new(width / 2.0, height / 2.0);
    let dx = target.x - center.x;
    let dy = target.y - center.y;

    let half_width = center.x - padding;
    let half_height = center.y - padding;

    let tx = if dx.abs() > f64::EPSILON { half_width / dx.abs() } else { f64::INFINITY };
    let ty = if dy.abs() > f64::EPSILON { half_height / dy.abs() } else { f64::INFINITY };
    let t = tx.min(ty);
    if !t.is_finite() {
        return center;
    }

    ScreenPoint::new(center.x + dx * t, center.y + dy * t)
}

/// Off-map labels for every marker projected outside the viewport, in
/// marker order.
///
/// A pure function of marker positions and the projection, so recomputing
/// it for an unchanged view yields the same list.
#[must_use]
pub fn off_map_labels<P: Projection>(graph: &RouteGraph, projection: &P, settings: &LabelsSettings) -> Vec<OffMapLabel> {
    if !settings.show_off_map_labels {
        return Vec::new();
    }

    let (width, height) = projection.screen_size();
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }

    graph
        .markers_ordered()
        .into_iter()
        .filter_map(|(_, marker)| {
            let point = projection.to_screen(marker.point);
            if !point.x.is_finite() || !point.y.is_finite() || projection.contains(point) {
                return None;
            }
            Some(OffMapLabel {
                marker_key: marker.key.clone(),
                screen_point: edge_point(point, width, height, settings.edge_padding),
                text: marker.label.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LatLng;
    use crate::models::Marker;
    use crate::overlay::MapViewport;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn graph() -> RouteGraph {
        let mut graph = RouteGraph::new();
        graph.add_marker(Marker::new("CDG", "Paris", LatLng::new(49.0, 2.5), false));
        graph.add_marker(Marker::new("JFK", "New York", LatLng::new(40.6, -73.8), false));
        graph.add_marker(Marker::new("NRT", "Tokyo", LatLng::new(35.8, 140.4), false));
        graph
    }

    #[test]
    fn test_edge_point_on_each_side() {
        let right = edge_point(ScreenPoint::new(1000.0, 100.0), 200.0, 200.0, 0.0);
        assert_close(right.x, 200.0);
        assert_close(right.y, 100.0);

        let top = edge_point(ScreenPoint::new(100.0, -500.0), 200.0, 200.0, 10.0);
        assert_close(top.x, 100.0);
        assert_close(top.y, 10.0);

        let corner = edge_point(ScreenPoint::new(-100.0, -100.0), 200.0, 200.0, 0.0);
        assert_close(corner.x, 0.0);
        assert_close(corner.y, 0.0);
    }

    #[test]
    fn test_only_offscreen_markers_get_labels() {
        let viewport = MapViewport::new(LatLng::new(48.0, 2.0), 5.0, 800.0, 600.0);
        let labels = off_map_labels(&graph(), &viewport, &LabelsSettings::default());

        let keys: Vec<&str> = labels.iter().map(|l| l.marker_key.as_str()).collect();
        assert_eq!(keys, vec!["JFK", "NRT"]);
        assert_eq!(labels[0].text, "New York");
        // New York is west of Paris: pinned to the left edge
        assert_close(labels[0].screen_point.x, LabelsSettings::default().edge_padding);
        assert!(labels.iter().all(|l| viewport.contains(l.screen_point)));
    }

    #[test]
    fn test_labels_are_idempotent() {
        let viewport = MapViewport::new(LatLng::new(48.0, 2.0), 4.0, 640.0, 480.0);
        let settings = LabelsSettings::default();
        let graph = graph();
        let first = off_map_labels(&graph, &viewport, &settings);
        let second = off_map_labels(&graph, &viewport, &settings);
        assert_eq!(first, second);
    }

    #[test]
    fn test_disabled_labels() {
        let viewport = MapViewport::new(LatLng::new(48.0, 2.0), 5.0, 800.0, 600.0);
        let settings = LabelsSettings {
            show_off_map_labels: false,
            ..LabelsSettings::default()
        };
        assert!(off_map_labels(&graph(), &viewport, &settings).is_empty());
    }
}
