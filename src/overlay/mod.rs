//! View-dependent decorations recomputed on zoom/pan: off-map labels and
//! pointy-line arrowheads.

pub mod labels;
pub mod pointy_line;
pub mod viewport;

pub use labels::{edge_point, off_map_labels, OffMapLabel};
pub use pointy_line::{arrow_rotation, ArrowHead, ArrowOptions, PointyLine};
pub use viewport::{MapViewport, Projection, ScreenPoint};
