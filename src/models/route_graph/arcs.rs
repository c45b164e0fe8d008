use super::RouteGraph;
use crate::models::RouteArc;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};

/// Extension trait for arc-related operations on `RouteGraph`
pub trait Arcs {
    /// Add an arc between two markers under its own key, return its `EdgeIndex`.
    /// An existing arc with the same key is returned unchanged.
    fn add_arc(&mut self, from: NodeIndex, to: NodeIndex, arc: RouteArc) -> EdgeIndex;

    /// Get `EdgeIndex` by arc key
    fn get_arc_index(&self, key: &str) -> Option<EdgeIndex>;

    fn get_arc(&self, index: EdgeIndex) -> Option<&RouteArc>;

    fn get_arc_by_key(&self, key: &str) -> Option<&RouteArc>;

    /// The (from, to) markers of an arc
    fn get_arc_markers(&self, index: EdgeIndex) -> Option<(NodeIndex, NodeIndex)>;

    /// Arcs in host order
    fn arcs_ordered(&self) -> Vec<(EdgeIndex, &RouteArc)>;
}

impl Arcs for RouteGraph {
    fn add_arc(&mut self, from: NodeIndex, to: NodeIndex, arc: RouteArc) -> EdgeIndex {
        if let Some(&index) = self.arc_key_to_index.get(&arc.key) {
            return index;
        }
        let key = arc.key.clone();
        let index = self.graph.add_edge(from, to, arc);
        self.arc_key_to_index.insert(key, index);
        index
    }

    fn get_arc_index(&self, key: &str) -> Option<EdgeIndex> {
        self.arc_key_to_index.get(key).copied()
    }

    fn get_arc(&self, index: EdgeIndex) -> Option<&RouteArc> {
        self.graph.edge_weight(index)
    }

    fn get_arc_by_key(&self, key: &str) -> Option<&RouteArc> {
        self.get_arc_index(key).and_then(|index| self.get_arc(index))
    }

    fn get_arc_markers(&self, index: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(index)
    }

    fn arcs_ordered(&self) -> Vec<(EdgeIndex, &RouteArc)> {
        self.arc_key_to_index
            .values()
            .filter_map(|&index| self.graph.edge_weight(index).map(|a| (index, a)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ArcShape, LatLng};
    use crate::models::{Marker, Markers, SelectionToken};

    fn arc(key: &str) -> RouteArc {
        let shape = ArcShape::straight(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
        RouteArc::new(key, 0, shape, SelectionToken::from(key))
    }

    #[test]
    fn test_add_arc() {
        let mut graph = RouteGraph::new();
        let a = graph.add_marker(Marker::new("A", "A", LatLng::new(0.0, 0.0), false));
        let b = graph.add_marker(Marker::new("B", "B", LatLng::new(1.0, 1.0), false));
        let edge = graph.add_arc(a, b, arc("AB"));

        assert_eq!(graph.arc_count(), 1);
        assert_eq!(graph.get_arc_index("AB"), Some(edge));
        assert_eq!(graph.get_arc_markers(edge), Some((a, b)));
        assert_eq!(graph.get_arc_by_key("AB").map(|a| a.key.as_str()), Some("AB"));
    }

    #[test]
    fn test_duplicate_arc_key_keeps_first() {
        let mut graph = RouteGraph::new();
        let a = graph.add_marker(Marker::new("A", "A", LatLng::new(0.0, 0.0), false));
        let b = graph.add_marker(Marker::new("B", "B", LatLng::new(1.0, 1.0), false));
        let first = graph.add_arc(a, b, arc("AB"));
        let second = graph.add_arc(b, a, arc("AB"));

        assert_eq!(first, second);
        assert_eq!(graph.arc_count(), 1);
        assert_eq!(graph.get_arc_markers(first), Some((a, b)));
    }

    #[test]
    fn test_arcs_ordered_follows_insertion() {
        let mut graph = RouteGraph::new();
        let a = graph.add_marker(Marker::new("A", "A", LatLng::new(0.0, 0.0), false));
        let b = graph.add_marker(Marker::new("B", "B", LatLng::new(1.0, 1.0), false));
        graph.add_arc(a, b, arc("second"));
        graph.add_arc(b, a, arc("first"));
        let keys: Vec<&str> = graph.arcs_ordered().iter().map(|(_, a)| a.key.as_str()).collect();
        assert_eq!(keys, vec!["second", "first"]);
    }
}
