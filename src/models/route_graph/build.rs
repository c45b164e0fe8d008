use super::{Arcs, Markers, RouteGraph};
use crate::constants::SHIFTED_MARKER_SUFFIX;
use crate::geometry::{ArcShape, LatLng};
use crate::logging::log;
use crate::models::{DirectionSet, Marker, RouteArc, RouteMapSettings, RouteShape, SelectionTokenSource};
use crate::style::{route_color, route_width, ThicknessScale};
use indexmap::IndexMap;

/// One marker instance seen while scanning directions
struct MarkerSeed {
    label: String,
    point: LatLng,
}

/// Builds a fresh `RouteGraph` from one update cycle's directions
pub trait GraphBuild {
    /// Markers come first for unshifted locations, then shifted instances,
    /// each group in first-seen order. A shifted instance is keyed
    /// `<location>_360` only when the same location also has an unshifted
    /// instance. Arcs follow direction order.
    fn from_directions(
        set: &DirectionSet,
        settings: &RouteMapSettings,
        tokens: &dyn SelectionTokenSource,
    ) -> Self
    where
        Self: Sized;

    /// Key of the marker instance for `location`, shifted or not
    fn marker_key_for(&self, location: &str, shifted: bool) -> Option<String>;
}

impl GraphBuild for RouteGraph {
    fn from_directions(
        set: &DirectionSet,
        settings: &RouteMapSettings,
        tokens: &dyn SelectionTokenSource,
    ) -> Self {
        let mut normal: IndexMap<&str, MarkerSeed> = IndexMap::new();
        let mut shifted: IndexMap<&str, MarkerSeed> = IndexMap::new();

        for direction in &set.directions {
            let endpoints = [
                (&direction.from_location, direction.path.from, direction.path.from_shifted, false),
                (&direction.to_location, direction.path.to, direction.path.to_shifted, true),
            ];
            for (location, point, is_shifted, destination) in endpoints {
                let seeds = if is_shifted { &mut shifted } else { &mut normal };
                seeds.entry(location.as_str()).or_insert_with(|| MarkerSeed {
                    label: direction.endpoint_label(destination).to_string(),
                    point,
                });
            }
        }

        let mut graph = Self::new();
        for (location, seed) in &normal {
            let mut marker = Marker::new(*location, seed.label.clone(), seed.point, false);
            marker.tooltip_fields = set.tooltips_for(location).to_vec();
            graph.add_marker(marker);
        }
        for (location, seed) in &shifted {
            let mut marker = Marker::new(*location, seed.label.clone(), seed.point, true);
            if normal.contains_key(location) {
                marker.key = format!("{location}{SHIFTED_MARKER_SUFFIX}");
            }
            marker.tooltip_fields = set.tooltips_for(location).to_vec();
            graph.add_marker(marker);
        }

        let scale = ThicknessScale::for_dataset(&set.directions, &settings.routes);

        for direction in &set.directions {
            let from_key = graph.marker_key_for(&direction.from_location, direction.path.from_shifted);
            let to_key = graph.marker_key_for(&direction.to_location, direction.path.to_shifted);
            let (Some(from), Some(to)) = (
                from_key.and_then(|k| graph.get_marker_index(&k)),
                to_key.and_then(|k| graph.get_marker_index(&k)),
            ) else {
                log!("Skipping direction {}: endpoint marker missing", direction.market_key);
                continue;
            };

            let shape = match settings.routes.shape {
                RouteShape::Curved => ArcShape::curved(direction.path.from, direction.path.to),
                RouteShape::Straight | RouteShape::Pointy => {
                    ArcShape::straight(direction.path.from, direction.path.to)
                }
            };

            let token = tokens.token_for(&direction.market_key, direction.index);
            let mut arc = RouteArc::new(direction.market_key.clone(), direction.index, shape, token);
            arc.color = route_color(direction, settings).to_string();
            arc.width = route_width(direction, scale.as_ref(), &settings.routes);
            arc.tooltip_fields.clone_from(&direction.tooltip_fields);
            graph.add_arc(from, to, arc);
        }

        log!(
            "Built route graph: {} markers, {} arcs",
            graph.marker_count(),
            graph.arc_count()
        );
        graph
    }

    fn marker_key_for(&self, location: &str, shifted: bool) -> Option<String> {
        if shifted {
            let twin = format!("{location}{SHIFTED_MARKER_SUFFIX}");
            if let Some(marker) = self.get_marker_by_key(&twin) {
                return Some(marker.key.clone());
            }
        }
        self.get_marker_by_key(location)
            .filter(|m| m.shifted == shifted)
            .map(|m| m.key.clone())
    }
}
