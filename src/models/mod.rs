mod arc;
mod direction;
mod marker;
mod route_graph;
mod settings;

pub use arc::{RouteArc, RowTokens, SelectionToken, SelectionTokenSource};
pub use direction::{BucketBounds, Direction, DirectionSet, TooltipField};
pub use marker::Marker;
pub use route_graph::{Arcs, GraphBuild, Markers, RouteGraph, SelectionRules};
pub use settings::{LabelsSettings, MarkersSettings, RouteMapSettings, RouteShape, RoutesSettings, StateSettings};
