use super::{Arcs, Markers, RouteGraph};
use crate::constants::{SELECTED_OPACITY, UNSELECTED_OPACITY};
use crate::models::SelectionToken;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};

const fn opacity_for(selected: bool) -> f64 {
    if selected {
        SELECTED_OPACITY
    } else {
        UNSELECTED_OPACITY
    }
}

/// Selection propagation between markers and arcs.
///
/// Every mutation leaves flags and opacities consistent: a selected entity
/// is fully opaque, an unselected one is dimmed, except after
/// `clear_selection(SELECTED_OPACITY)` which restores the resting state.
pub trait SelectionRules {
    /// Set every marker and arc unselected at the given opacity
    fn clear_selection(&mut self, opacity: f64);

    /// Flip a marker, then spread its new state one hop: every incident arc
    /// whose state differs is set to match, and so is that arc's other
    /// marker. Returns the marker's new state.
    fn toggle_marker(&mut self, index: NodeIndex) -> Option<bool>;

    /// Flip an arc, then recompute both endpoint markers as selected iff at
    /// least one of their incident arcs is selected. Returns the arc's new
    /// state.
    fn toggle_arc(&mut self, index: EdgeIndex) -> Option<bool>;

    fn set_marker_state(&mut self, index: NodeIndex, selected: bool);

    fn set_arc_state(&mut self, index: EdgeIndex, selected: bool);

    #[must_use]
    fn has_selection(&self) -> bool;

    /// Tokens a click on this marker asks the host to select: all incident
    /// arcs for an unselected marker, only the selected ones otherwise
    #[must_use]
    fn marker_click_tokens(&self, index: NodeIndex) -> Vec<SelectionToken>;
}

impl SelectionRules for RouteGraph {
    fn clear_selection(&mut self, opacity: f64) {
        for marker in self.graph.node_weights_mut() {
            marker.is_selected = false;
            marker.opacity = opacity;
        }
        for arc in self.graph.edge_weights_mut() {
            arc.is_selected = false;
            arc.opacity = opacity;
        }
    }

    fn toggle_marker(&mut self, index: NodeIndex) -> Option<bool> {
        let selected = !self.get_marker(index)?.is_selected;
        self.set_marker_state(index, selected);

        for edge in self.get_marker_arcs(index) {
            let Some(arc) = self.get_arc(edge) else {
                continue;
            };
            if arc.is_selected == selected {
                continue;
            }
            self.set_arc_state(edge, selected);

            let Some((from, to)) = self.get_arc_markers(edge) else {
                continue;
            };
            let other = if from == index { to } else { from };
            if other != index {
                self.set_marker_state(other, selected);
            }
        }

        Some(selected)
    }

    fn toggle_arc(&mut self, index: EdgeIndex) -> Option<bool> {
        let selected = !self.get_arc(index)?.is_selected;
        self.set_arc_state(index, selected);

        let (from, to) = self.get_arc_markers(index)?;
        for marker in [from, to] {
            let any_selected = self
                .get_marker_arcs(marker)
                .into_iter()
                .filter_map(|edge| self.get_arc(edge))
                .any(|arc| arc.is_selected);
            self.set_marker_state(marker, any_selected);
        }

        Some(selected)
    }

    fn set_marker_state(&mut self, index: NodeIndex, selected: bool) {
        if let Some(marker) = self.graph.node_weight_mut(index) {
            marker.is_selected = selected;
            marker.opacity = opacity_for(selected);
        }
    }

    fn set_arc_state(&mut self, index: EdgeIndex, selected: bool) {
        if let Some(arc) = self.graph.edge_weight_mut(index) {
            arc.is_selected = selected;
            arc.opacity = opacity_for(selected);
        }
    }

    fn has_selection(&self) -> bool {
        self.graph.node_weights().any(|m| m.is_selected) || self.graph.edge_weights().any(|a| a.is_selected)
    }

    fn marker_click_tokens(&self, index: NodeIndex) -> Vec<SelectionToken> {
        let Some(marker) = self.get_marker(index) else {
            return Vec::new();
        };
        self.get_marker_arcs(index)
            .into_iter()
            .filter_map(|edge| self.get_arc(edge))
            .filter(|arc| !marker.is_selected || arc.is_selected)
            .map(|arc| arc.selection_token.clone())
            .collect()
    }
}
