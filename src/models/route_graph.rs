mod arcs;
mod build;
mod markers;
mod selection;

pub use arcs::Arcs;
pub use build::GraphBuild;
pub use markers::Markers;
pub use selection::SelectionRules;

use super::{Marker, RouteArc};
use indexmap::IndexMap;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};

/// Markers and arcs of one update cycle.
///
/// Markers are nodes and arcs are directed edges (from -> to), so each arc
/// references exactly two markers and each marker's arcs are exactly its
/// incident edges. Key maps preserve insertion order, which is the order
/// entities are handed to the rendering host.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    pub graph: StableDiGraph<Marker, RouteArc>,
    pub marker_key_to_index: IndexMap<String, NodeIndex>,
    pub arc_key_to_index: IndexMap<String, EdgeIndex>,
}

impl RouteGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
