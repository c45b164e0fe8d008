use crate::constants::{MAX_MERCATOR_LATITUDE, TILE_SIZE};
use crate::geometry::LatLng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pixel position relative to the top-left corner of the map container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Maps geographic points onto the visible map area
pub trait Projection {
    fn to_screen(&self, point: LatLng) -> ScreenPoint;

    /// Visible area size in pixels (width, height)
    fn screen_size(&self) -> (f64, f64);

    fn contains(&self, point: ScreenPoint) -> bool {
        let (width, height) = self.screen_size();
        point.x >= 0.0 && point.x <= width && point.y >= 0.0 && point.y <= height
    }
}

/// Web-Mercator view of the map widget, as reported on zoom/pan end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapViewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl MapViewport {
    #[must_use]
    pub const fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    #[must_use]
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Absolute world pixel of a point at the current zoom
    #[must_use]
    pub fn project(&self, point: LatLng) -> ScreenPoint {
        let size = self.world_size();
        let lat = point.lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let sin = lat.to_radians().sin();
        let x = (point.lng + 180.0) / 360.0 * size;
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size;
        ScreenPoint::new(x, y)
    }

    /// Inverse of `project`
    #[must_use]
    pub fn unproject(&self, pixel: ScreenPoint) -> LatLng {
        let size = self.world_size();
        let lng = pixel.x / size * 360.0 - 180.0;
        let n = PI - 2.0 * PI * pixel.y / size;
        let lat = n.sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }

    /// Container pixel back to a geographic point
    #[must_use]
    pub fn to_lat_lng(&self, point: ScreenPoint) -> LatLng {
        let origin = self.pixel_origin();
        self.unproject(ScreenPoint::new(point.x + origin.x, point.y + origin.y))
    }

    /// World pixel of the container's top-left corner
    fn pixel_origin(&self) -> ScreenPoint {
        let center = self.project(self.center);
        ScreenPoint::new(center.x - self.width / 2.0, center.y - self.height / 2.0)
    }

    /// View that fits every point inside a `width` x `height` container with
    /// `padding` pixels to spare on each side. `None` for an empty point set.
    #[must_use]
    pub fn fit_bounds(points: &[LatLng], width: f64, height: f64, padding: f64, max_zoom: f64) -> Option<Self> {
        let first = points.first()?;
        let (mut south, mut west, mut north, mut east) = (first.lat, first.lng, first.lat, first.lng);
        for point in points {
            south = south.min(point.lat);
            north = north.max(point.lat);
            west = west.min(point.lng);
            east = east.max(point.lng);
        }

        // Projected extent at zoom 0
        let base = Self::new(LatLng::new(0.0, 0.0), 0.0, width, height);
        let south_west = base.project(LatLng::new(south, west));
        let north_east = base.project(LatLng::new(north, east));
        let span_x = (north_east.x - south_west.x).abs();
        let span_y = (south_west.y - north_east.y).abs();

        let usable_width = (width - 2.0 * padding).max(1.0);
        let usable_height = (height - 2.0 * padding).max(1.0);
        let scale = match (span_x > 0.0, span_y > 0.0) {
            (true, true) => (usable_width / span_x).min(usable_height / span_y),
            (true, false) => usable_width / span_x,
            (false, true) => usable_height / span_y,
            (false, false) => max_zoom.exp2(),
        };
        let zoom = scale.log2().floor().clamp(0.0, max_zoom);

        let center_pixel = ScreenPoint::new(
            (south_west.x + north_east.x) / 2.0,
            (south_west.y + north_east.y) / 2.0,
        );
        let center = base.unproject(center_pixel);
        Some(Self::new(center, zoom, width, height))
    }
}

impl Projection for MapViewport {
    fn to_screen(&self, point: LatLng) -> ScreenPoint {
        let origin = self.pixel_origin();
        let pixel = self.project(point);
        ScreenPoint::new(pixel.x - origin.x, pixel.y - origin.y)
    }

    fn screen_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}
