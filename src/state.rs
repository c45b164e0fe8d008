use crate::geometry::{ArcShape, LatLng};
use crate::import::{build_directions, RouteTable};
use crate::logging::log;
use crate::models::{
    Arcs, GraphBuild, Markers, RouteGraph, RouteMapSettings, RouteShape, RowTokens, SelectionToken,
    SelectionTokenSource, TooltipField,
};
use crate::overlay::{off_map_labels, ArrowHead, MapViewport, OffMapLabel, PointyLine, Projection};
use crate::selection::{
    arc_click, background_click, commit, marker_click, ClickModifiers, EntityKey, SelectionDelta, SelectionRequest,
    SelectionSession,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Arc as handed to the rendering host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcDescriptor {
    pub key: String,
    pub shape: ArcShape,
    /// Shape flattened into a polyline
    pub vertices: Vec<LatLng>,
    pub color: String,
    pub stroke_width: f64,
    pub selection_token: SelectionToken,
    pub is_selected: bool,
    pub opacity: f64,
    /// Draw a source arrowhead (pointy lines)
    pub pointy: bool,
    pub tooltip_fields: Vec<TooltipField>,
}

/// Marker as handed to the rendering host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDescriptor {
    pub key: String,
    pub point: LatLng,
    pub color: String,
    pub radius: f64,
    /// Permanent label text, when labels are shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub label_font_color: String,
    /// Tokens of the arcs a click on this marker selects
    pub selection_tokens: Vec<SelectionToken>,
    pub is_selected: bool,
    pub opacity: f64,
    pub fill_opacity: f64,
    pub tooltip_fields: Vec<TooltipField>,
}

/// Map widget events that change the projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewEvent {
    Reset,
    ZoomStart,
    ZoomEnd,
    MoveEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowDescriptor {
    pub arc_key: String,
    pub arrow: ArrowHead,
    pub color: String,
    pub opacity: f64,
}

/// Everything that depends on the current view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOverlay {
    pub labels: Vec<OffMapLabel>,
    pub arrows: Vec<ArrowDescriptor>,
}

/// Per-visual state: the graph of the current update cycle plus the
/// selection session and view-derived overlays.
///
/// Rebuilt wholesale by `update`; click handlers mutate only selection flags.
#[derive(Debug, Clone, Default)]
pub struct RouteMapState {
    graph: RouteGraph,
    settings: RouteMapSettings,
    session: SelectionSession,
    generation: u64,
    pointy_lines: IndexMap<String, PointyLine>,
    viewport: Option<MapViewport>,
}

impl RouteMapState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    #[must_use]
    pub const fn settings(&self) -> &RouteMapSettings {
        &self.settings
    }

    #[must_use]
    pub const fn session(&self) -> &SelectionSession {
        &self.session
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Rebuild from a new data cycle with the default token source
    pub fn update(&mut self, table: &RouteTable, settings: &RouteMapSettings) -> u64 {
        self.update_with_tokens(table, settings, &RowTokens)
    }

    /// Rebuild from a new data cycle. Pending selection requests from the
    /// previous build become stale. Returns the new generation.
    pub fn update_with_tokens(
        &mut self,
        table: &RouteTable,
        settings: &RouteMapSettings,
        tokens: &dyn SelectionTokenSource,
    ) -> u64 {
        self.settings = settings.clamped();
        let directions = build_directions(table);
        self.graph = RouteGraph::from_directions(&directions, &self.settings, tokens);
        self.session = SelectionSession::default();
        self.generation += 1;
        self.rebuild_pointy_lines();

        log!(
            "Route map update {}: {} directions, {} markers, {} arcs",
            self.generation,
            directions.directions.len(),
            self.graph.marker_count(),
            self.graph.arc_count()
        );
        self.generation
    }

    /// Rebuild from JSON documents
    ///
    /// # Errors
    ///
    /// Returns an error if either document fails to parse
    pub fn update_from_json(&mut self, table_json: &str, settings_json: &str) -> Result<u64, String> {
        let table = RouteTable::from_json(table_json)?;
        let settings = RouteMapSettings::from_json(settings_json)?;
        Ok(self.update(&table, &settings))
    }

    fn rebuild_pointy_lines(&mut self) {
        self.pointy_lines.clear();
        if self.settings.routes.shape != RouteShape::Pointy {
            return;
        }
        for (_, arc) in self.graph.arcs_ordered() {
            let Some((from, to)) = arc.shape.endpoints() else {
                continue;
            };
            let mut line = PointyLine::new(arc.key.clone(), from, to, arc.width, arc.color.clone());
            line.opacity = arc.opacity;
            if let Some(viewport) = &self.viewport {
                line.redraw(viewport);
            }
            self.pointy_lines.insert(arc.key.clone(), line);
        }
    }

    #[must_use]
    pub fn arc_descriptors(&self) -> Vec<ArcDescriptor> {
        let pointy = self.settings.routes.shape == RouteShape::Pointy;
        self.graph
            .arcs_ordered()
            .into_iter()
            .map(|(_, arc)| ArcDescriptor {
                key: arc.key.clone(),
                vertices: arc.shape.polyline_vertices(),
                shape: arc.shape.clone(),
                color: arc.color.clone(),
                stroke_width: arc.width,
                selection_token: arc.selection_token.clone(),
                is_selected: arc.is_selected,
                opacity: arc.opacity,
                pointy,
                tooltip_fields: arc.tooltip_fields.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn marker_descriptors(&self) -> Vec<MarkerDescriptor> {
        let markers = &self.settings.markers;
        self.graph
            .markers_ordered()
            .into_iter()
            .map(|(index, marker)| MarkerDescriptor {
                key: marker.key.clone(),
                point: marker.point,
                color: markers.marker_color.clone(),
                radius: markers.radius,
                label: markers.show_labels.then(|| marker.label.clone()),
                label_font_color: markers.label_font_color.clone(),
                selection_tokens: self
                    .graph
                    .get_marker_arcs(index)
                    .into_iter()
                    .filter_map(|edge| self.graph.get_arc(edge))
                    .map(|arc| arc.selection_token.clone())
                    .collect(),
                is_selected: marker.is_selected,
                opacity: marker.opacity,
                fill_opacity: marker.opacity,
                tooltip_fields: marker.tooltip_fields.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn marker_clicked(&self, key: &str, modifiers: ClickModifiers) -> Option<SelectionRequest> {
        marker_click(&self.graph, &self.session, key, modifiers, self.generation)
    }

    #[must_use]
    pub fn arc_clicked(&self, key: &str, modifiers: ClickModifiers) -> Option<SelectionRequest> {
        arc_click(&self.graph, &self.session, key, modifiers, self.generation)
    }

    #[must_use]
    pub fn background_clicked(&self, modifiers: ClickModifiers) -> Option<SelectionRequest> {
        background_click(&self.graph, modifiers, self.generation)
    }

    /// Apply a request the host has confirmed. Requests made against an
    /// older build are ignored.
    pub fn commit(&mut self, request: &SelectionRequest) -> Vec<SelectionDelta> {
        if request.generation != self.generation {
            log!(
                "Ignoring selection request for build {} (current {})",
                request.generation,
                self.generation
            );
            return Vec::new();
        }

        let deltas = commit(&mut self.graph, &mut self.session, request);
        for delta in &deltas {
            let EntityKey::Arc(key) = &delta.key else {
                continue;
            };
            let Some(line) = self.pointy_lines.get_mut(key) else {
                continue;
            };
            line.opacity = delta.opacity;
        }
        deltas
    }

    /// React to a map widget event. Zoom start hides arrowheads; the other
    /// events recompute labels and arrowheads for `viewport`.
    pub fn view_changed(&mut self, event: ViewEvent, viewport: MapViewport) -> ViewOverlay {
        self.viewport = Some(viewport);
        match event {
            ViewEvent::ZoomStart => {
                for line in self.pointy_lines.values_mut() {
                    line.delete_marker();
                }
            }
            ViewEvent::Reset => {
                for line in self.pointy_lines.values_mut() {
                    line.redraw(&viewport);
                }
            }
            ViewEvent::ZoomEnd | ViewEvent::MoveEnd => {
                for line in self.pointy_lines.values_mut() {
                    line.update_marker(&viewport);
                }
            }
        }
        self.overlay(&viewport)
    }

    /// Current labels and arrowheads for a view, without touching state
    #[must_use]
    pub fn overlay<P: Projection>(&self, projection: &P) -> ViewOverlay {
        ViewOverlay {
            labels: off_map_labels(&self.graph, projection, &self.settings.labels),
            arrows: self
                .pointy_lines
                .values()
                .filter_map(|line| {
                    line.arrow.map(|arrow| ArrowDescriptor {
                        arc_key: line.arc_key.clone(),
                        arrow,
                        color: line.color.clone(),
                        opacity: line.opacity,
                    })
                })
                .collect(),
        }
    }

    /// View fitting every arc, as done after each data update
    #[must_use]
    pub fn fit_view(&self, width: f64, height: f64, padding: f64, max_zoom: f64) -> Option<MapViewport> {
        let points: Vec<LatLng> = self
            .graph
            .arcs_ordered()
            .into_iter()
            .flat_map(|(_, arc)| arc.shape.polyline_vertices())
            .collect();
        MapViewport::fit_bounds(&points, width, height, padding, max_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CURVE_SEGMENTS;
    use crate::import::parse_route_csv;

    const ROUTES: &str = "\
market,from,to,from_lat,from_lng,to_lat,to_lng
CDG-JFK,CDG,JFK,49.0,2.5,40.6,-73.8
CDG-NRT,CDG,NRT,49.0,2.5,35.8,140.4
HND-LAX,HND,LAX,35.5,139.8,33.9,-118.4
";

    fn state(shape: RouteShape) -> RouteMapState {
        let table = parse_route_csv(ROUTES).expect("Should parse CSV");
        let mut settings = RouteMapSettings::default();
        settings.routes.shape = shape;
        let mut state = RouteMapState::new();
        state.update(&table, &settings);
        state
    }

    #[test]
    fn test_update_builds_descriptors() {
        let state = state(RouteShape::Curved);
        assert_eq!(state.generation(), 1);

        let arcs = state.arc_descriptors();
        assert_eq!(arcs.len(), 3);
        assert!(arcs[0].shape.is_curve());
        assert_eq!(arcs[0].vertices.len(), CURVE_SEGMENTS + 1);
        assert_eq!(arcs[0].selection_token, SelectionToken::from("CDG-JFK#0"));

        let markers = state.marker_descriptors();
        let cdg = markers.iter().find(|m| m.key == "CDG").expect("CDG");
        assert_eq!(cdg.selection_tokens.len(), 2);
        assert_eq!(cdg.label.as_deref(), Some("CDG"));
        assert_eq!(cdg.fill_opacity, 1.0);
    }

    #[test]
    fn test_click_commit_cycle() {
        let mut state = state(RouteShape::Straight);
        let request = state.marker_clicked("CDG", ClickModifiers::empty()).expect("known marker");
        let deltas = state.commit(&request);
        assert!(!deltas.is_empty());
        assert!(state.graph().get_marker_by_key("JFK").is_some_and(|m| m.is_selected));
        assert!(state.graph().get_marker_by_key("LAX").is_some_and(|m| !m.is_selected));

        let clear = state.background_clicked(ClickModifiers::empty()).expect("clear");
        state.commit(&clear);
        assert!(state.marker_descriptors().iter().all(|m| !m.is_selected && m.opacity == 1.0));
    }

    #[test]
    fn test_stale_request_is_ignored() {
        let mut state = state(RouteShape::Curved);
        let request = state.marker_clicked("CDG", ClickModifiers::empty()).expect("known marker");

        let table = parse_route_csv(ROUTES).expect("Should parse CSV");
        state.update(&table, &RouteMapSettings::default());
        assert!(state.commit(&request).is_empty());
        assert!(state.marker_descriptors().iter().all(|m| !m.is_selected));
    }

    #[test]
    fn test_pointy_arrows_follow_view_events() {
        let mut state = state(RouteShape::Pointy);
        assert!(state.arc_descriptors().iter().all(|a| a.pointy));

        let viewport = MapViewport::new(LatLng::new(48.0, 2.0), 3.0, 800.0, 600.0);
        let overlay = state.view_changed(ViewEvent::Reset, viewport);
        let keys: Vec<&str> = overlay.arrows.iter().map(|a| a.arc_key.as_str()).collect();
        assert_eq!(keys, vec!["CDG-JFK", "CDG-NRT"]);

        let overlay = state.view_changed(ViewEvent::ZoomStart, viewport);
        assert!(overlay.arrows.is_empty());

        let overlay = state.view_changed(ViewEvent::ZoomEnd, viewport);
        assert_eq!(overlay.arrows.len(), 2);
    }

    #[test]
    fn test_view_change_labels_offscreen_markers() {
        let mut state = state(RouteShape::Curved);
        let viewport = MapViewport::new(LatLng::new(48.0, 2.0), 5.0, 800.0, 600.0);
        let first = state.view_changed(ViewEvent::MoveEnd, viewport);
        let second = state.view_changed(ViewEvent::MoveEnd, viewport);
        assert_eq!(first, second);
        assert!(first.labels.iter().any(|l| l.marker_key == "JFK"));
        assert!(first.labels.iter().all(|l| l.marker_key != "CDG"));
    }

    #[test]
    fn test_fit_view_covers_arcs() {
        let state = state(RouteShape::Straight);
        let viewport = state.fit_view(1024.0, 768.0, 20.0, 18.0).expect("arcs present");
        for descriptor in state.marker_descriptors() {
            assert!(viewport.contains(viewport.to_screen(descriptor.point)));
        }
        assert!(RouteMapState::new().fit_view(1024.0, 768.0, 20.0, 18.0).is_none());
    }

    #[test]
    fn test_update_from_json() {
        let mut state = RouteMapState::new();
        let table = r#"{"markets": [], "fromLocations": [], "toLocations": []}"#;
        assert_eq!(state.update_from_json(table, "{}"), Ok(1));
        assert!(state.graph().is_empty());
        assert!(state.update_from_json("nope", "{}").is_err());
    }
}
