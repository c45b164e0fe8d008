use super::RouteGraph;
use crate::models::Marker;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Extension trait for marker-related operations on `RouteGraph`
pub trait Markers {
    /// Add a marker under its own key, return its `NodeIndex`.
    /// An existing marker with the same key is returned unchanged.
    fn add_marker(&mut self, marker: Marker) -> NodeIndex;

    /// Get `NodeIndex` by marker key
    fn get_marker_index(&self, key: &str) -> Option<NodeIndex>;

    fn get_marker(&self, index: NodeIndex) -> Option<&Marker>;

    fn get_marker_by_key(&self, key: &str) -> Option<&Marker>;

    /// Arcs touching a marker, ascending by edge index; a self-loop appears once
    fn get_marker_arcs(&self, index: NodeIndex) -> Vec<EdgeIndex>;

    /// Markers in host order
    fn markers_ordered(&self) -> Vec<(NodeIndex, &Marker)>;
}

impl Markers for RouteGraph {
    fn add_marker(&mut self, marker: Marker) -> NodeIndex {
        if let Some(&index) = self.marker_key_to_index.get(&marker.key) {
            return index;
        }
        let key = marker.key.clone();
        let index = self.graph.add_node(marker);
        self.marker_key_to_index.insert(key, index);
        index
    }

    fn get_marker_index(&self, key: &str) -> Option<NodeIndex> {
        self.marker_key_to_index.get(key).copied()
    }

    fn get_marker(&self, index: NodeIndex) -> Option<&Marker> {
        self.graph.node_weight(index)
    }

    fn get_marker_by_key(&self, key: &str) -> Option<&Marker> {
        self.get_marker_index(key).and_then(|index| self.get_marker(index))
    }

    fn get_marker_arcs(&self, index: NodeIndex) -> Vec<EdgeIndex> {
        let mut arcs: Vec<EdgeIndex> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .chain(self.graph.edges_directed(index, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        arcs.sort_unstable();
        arcs.dedup();
        arcs
    }

    fn markers_ordered(&self) -> Vec<(NodeIndex, &Marker)> {
        self.marker_key_to_index
            .values()
            .filter_map(|&index| self.graph.node_weight(index).map(|m| (index, m)))
            .collect()
    }
}
