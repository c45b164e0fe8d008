/// Opacity applied to selected entities, and to everything when nothing is selected
pub const SELECTED_OPACITY: f64 = 1.0;

/// Opacity applied to entities left out of an active selection
pub const UNSELECTED_OPACITY: f64 = 0.3;

/// Key suffix for the longitude-shifted twin of a location marker
pub const SHIFTED_MARKER_SUFFIX: &str = "_360";

/// Longitude shift used to route across the antimeridian
pub const ANTIMERIDIAN_SHIFT: f64 = 360.0;

/// Arcs whose half-length exceeds this many radians get a flatter bulge
pub const LONG_ARC_FLATTEN_RADIANS: f64 = 0.6;

/// Below this magnitude a slope denominator is treated as zero
pub const SLOPE_EPSILON: f64 = 1e-12;

/// Segments used when a curve is flattened into a polyline
pub const CURVE_SEGMENTS: usize = 32;

/// Legal marker radius bounds (px)
pub const MIN_MARKER_RADIUS: f64 = 1.0;
pub const MAX_MARKER_RADIUS: f64 = 20.0;

/// Legal route thickness bounds (px)
pub const MIN_ROUTE_THICKNESS: f64 = 0.2;
pub const MAX_ROUTE_THICKNESS: f64 = 25.0;

/// Pointy-line arrowhead defaults
pub const ARROW_WIDTH_COEF: f64 = 5.0;
pub const ARROW_LENGTH_PART: f64 = 0.4;
pub const ARROW_MAX_LENGTH: f64 = 60.0;

/// Web-Mercator tile size (px) at zoom 0
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web-Mercator projection
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;
