//! Click-driven selection, split in two phases.
//!
//! A click produces a [`SelectionRequest`] without touching the graph. The
//! host forwards it to its selection manager and, once that resolves, hands
//! it back to [`commit`], which mutates flags and reports the visual changes.
//! A request the host rejects is simply dropped, leaving the graph as it was.

use crate::constants::{SELECTED_OPACITY, UNSELECTED_OPACITY};
use crate::models::{Arcs, Markers, RouteGraph, SelectionRules, SelectionToken};
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClickModifiers: u8 {
        /// Ctrl held: add to the current selection
        const MULTI_SELECT      = 0b0000_0001;
        /// The event was already handled by a map entity
        const DEFAULT_PREVENTED = 0b0000_0010;
    }
}

impl ClickModifiers {
    #[must_use]
    pub const fn is_multi_select(self) -> bool {
        self.contains(Self::MULTI_SELECT)
    }
}

/// Identity of a clickable entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "camelCase")]
pub enum EntityKey {
    Marker(String),
    Arc(String),
}

impl EntityKey {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Marker(key) | Self::Arc(key) => key,
        }
    }
}

/// What the host selection manager is asked to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionAction {
    Select {
        tokens: Vec<SelectionToken>,
        multi_select: bool,
    },
    Clear,
}

/// A selection change waiting for host confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    /// Graph build the request was made against
    pub generation: u64,
    /// Clicked entity; `None` for a background click
    pub target: Option<EntityKey>,
    pub action: SelectionAction,
}

/// Visual change of one entity after a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDelta {
    pub key: EntityKey,
    pub is_selected: bool,
    pub opacity: f64,
    /// Set for filled shapes (markers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
}

/// Multi-select session state, carried across clicks of one graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSession {
    /// No click has been committed since the last full clear
    pub first_multi_select: bool,
    /// Entity whose click started the current selection
    pub anchor: Option<EntityKey>,
}

impl Default for SelectionSession {
    fn default() -> Self {
        Self {
            first_multi_select: true,
            anchor: None,
        }
    }
}

impl SelectionSession {
    pub fn reset(&mut self) {
        self.first_multi_select = true;
        self.anchor = None;
    }
}

/// Action for a plain or multi-select click on an entity. A plain click on a
/// selected entity clears everything when that entity started the selection
/// and is ignored otherwise.
fn click_action(
    session: &SelectionSession,
    target: &EntityKey,
    is_selected: bool,
    multi_select: bool,
    tokens: impl FnOnce() -> Vec<SelectionToken>,
) -> Option<SelectionAction> {
    if is_selected && !multi_select {
        return (session.anchor.as_ref() == Some(target)).then_some(SelectionAction::Clear);
    }
    Some(SelectionAction::Select {
        tokens: tokens(),
        multi_select,
    })
}

/// Request for a click on a marker.
///
/// Clicking an already selected marker without the multi-select modifier
/// never asks for a redundant select: it clears the selection when the
/// marker started it and yields no request otherwise.
#[must_use]
pub fn marker_click(
    graph: &RouteGraph,
    session: &SelectionSession,
    key: &str,
    modifiers: ClickModifiers,
    generation: u64,
) -> Option<SelectionRequest> {
    let index = graph.get_marker_index(key)?;
    let marker = graph.get_marker(index)?;
    let target = EntityKey::Marker(key.to_string());
    let action = click_action(session, &target, marker.is_selected, modifiers.is_multi_select(), || {
        graph.marker_click_tokens(index)
    })?;

    Some(SelectionRequest {
        generation,
        target: Some(target),
        action,
    })
}

/// Request for a click on an arc, with the same rules as `marker_click`
#[must_use]
pub fn arc_click(
    graph: &RouteGraph,
    session: &SelectionSession,
    key: &str,
    modifiers: ClickModifiers,
    generation: u64,
) -> Option<SelectionRequest> {
    let arc = graph.get_arc_by_key(key)?;
    let target = EntityKey::Arc(key.to_string());
    let action = click_action(session, &target, arc.is_selected, modifiers.is_multi_select(), || {
        vec![arc.selection_token.clone()]
    })?;

    Some(SelectionRequest {
        generation,
        target: Some(target),
        action,
    })
}

/// Request for a click on the map background: a full clear, unless a
/// modifier is held, an entity already handled the event, or nothing is
/// selected
#[must_use]
pub fn background_click(graph: &RouteGraph, modifiers: ClickModifiers, generation: u64) -> Option<SelectionRequest> {
    if modifiers.intersects(ClickModifiers::MULTI_SELECT | ClickModifiers::DEFAULT_PREVENTED) {
        return None;
    }
    if !graph.has_selection() {
        return None;
    }
    Some(SelectionRequest {
        generation,
        target: None,
        action: SelectionAction::Clear,
    })
}

fn visual_state(graph: &RouteGraph) -> Vec<(EntityKey, bool, f64)> {
    let markers = graph
        .markers_ordered()
        .into_iter()
        .map(|(_, m)| (EntityKey::Marker(m.key.clone()), m.is_selected, m.opacity));
    let arcs = graph
        .arcs_ordered()
        .into_iter()
        .map(|(_, a)| (EntityKey::Arc(a.key.clone()), a.is_selected, a.opacity));
    markers.chain(arcs).collect()
}

/// Start of a fresh selection: everything dimmed and unselected except the
/// clicked entity's own flag, which the toggle then flips
fn reset_for_target(graph: &mut RouteGraph, target: &EntityKey) {
    match target {
        EntityKey::Marker(key) => {
            let index = graph.get_marker_index(key);
            let previous = index.and_then(|i| graph.get_marker(i)).map(|m| (m.is_selected, m.opacity));
            graph.clear_selection(UNSELECTED_OPACITY);
            if let (Some(i), Some((selected, opacity))) = (index, previous) {
                if let Some(marker) = graph.graph.node_weight_mut(i) {
                    marker.is_selected = selected;
                    marker.opacity = opacity;
                }
            }
        }
        EntityKey::Arc(key) => {
            let index = graph.get_arc_index(key);
            let previous = index.and_then(|i| graph.get_arc(i)).map(|a| (a.is_selected, a.opacity));
            graph.clear_selection(UNSELECTED_OPACITY);
            if let (Some(i), Some((selected, opacity))) = (index, previous) {
                if let Some(arc) = graph.graph.edge_weight_mut(i) {
                    arc.is_selected = selected;
                    arc.opacity = opacity;
                }
            }
        }
    }
}

/// Apply a host-confirmed request and return the entities whose visual
/// state changed, markers first.
///
/// A clear returns every entity to unselected at full opacity and resets the
/// session. A select clears everything else first when it is not a
/// multi-select or opens a new multi-select session, then toggles the
/// clicked entity with its propagation rule.
pub fn commit(graph: &mut RouteGraph, session: &mut SelectionSession, request: &SelectionRequest) -> Vec<SelectionDelta> {
    let before = visual_state(graph);

    match (&request.action, &request.target) {
        (SelectionAction::Clear, _) => {
            graph.clear_selection(SELECTED_OPACITY);
            session.reset();
        }
        (SelectionAction::Select { multi_select, .. }, Some(target)) => {
            if session.first_multi_select || !multi_select {
                reset_for_target(graph, target);
                session.first_multi_select = false;
                session.anchor = Some(target.clone());
            }
            match target {
                EntityKey::Marker(key) => {
                    if let Some(index) = graph.get_marker_index(key) {
                        graph.toggle_marker(index);
                    }
                }
                EntityKey::Arc(key) => {
                    if let Some(index) = graph.get_arc_index(key) {
                        graph.toggle_arc(index);
                    }
                }
            }
        }
        (SelectionAction::Select { .. }, None) => return Vec::new(),
    }

    let after = visual_state(graph);
    before
        .into_iter()
        .zip(after)
        .filter(|(old, new)| old.1 != new.1 || (old.2 - new.2).abs() > f64::EPSILON)
        .map(|(_, (key, is_selected, opacity))| {
            let fill_opacity = matches!(key, EntityKey::Marker(_)).then_some(opacity);
            SelectionDelta {
                key,
                is_selected,
                opacity,
                fill_opacity,
            }
        })
        .collect()
}
