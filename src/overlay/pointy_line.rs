use super::viewport::{Projection, ScreenPoint};
use crate::constants::{ARROW_LENGTH_PART, ARROW_MAX_LENGTH, ARROW_WIDTH_COEF};
use crate::geometry::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrowOptions {
    /// Arrow base width as a multiple of the line weight
    pub width_coef: f64,
    /// Arrow length as a share of the on-screen line length, in [0, 1]
    pub length_part: f64,
    /// Upper bound for the arrow length (px)
    pub max_length: f64,
}

impl Default for ArrowOptions {
    fn default() -> Self {
        Self {
            width_coef: ARROW_WIDTH_COEF,
            length_part: ARROW_LENGTH_PART,
            max_length: ARROW_MAX_LENGTH,
        }
    }
}

impl ArrowOptions {
    #[must_use]
    pub fn checked(mut self) -> Self {
        self.length_part = if self.length_part.is_nan() {
            0.0
        } else {
            self.length_part.clamp(0.0, 1.0)
        };
        self
    }
}

/// Triangle drawn at the source end of a pointy line.
///
/// Anchored at its base centre on the source point and rotated around that
/// anchor by `rotation_degrees` (clockwise, screen coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowHead {
    pub anchor: ScreenPoint,
    pub width: f64,
    pub length: f64,
    pub rotation_degrees: f64,
}

/// Rotation that aligns an upward-pointing triangle with the unit vector
/// `(ux, uy)` in screen space
#[must_use]
pub fn arrow_rotation(ux: f64, uy: f64) -> f64 {
    let tan = if ux.abs() > 1e-5 {
        uy / ux
    } else if uy > 0.0 {
        f64::INFINITY
    } else {
        f64::NEG_INFINITY
    };

    let mut degrees = tan.atan().to_degrees() + 90.0;
    if (tan > 0.0 && uy < 0.0) || (tan < 0.0 && ux < 0.0) {
        degrees += 180.0;
    }
    degrees
}

/// Straight route line with a direction arrow at its source end.
///
/// The line itself never changes with the view; the arrow is derived from
/// the current projection and only exists while the source point is visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointyLine {
    pub arc_key: String,
    pub from: LatLng,
    pub to: LatLng,
    pub weight: f64,
    pub color: String,
    pub opacity: f64,
    pub options: ArrowOptions,
    pub arrow: Option<ArrowHead>,
}

impl PointyLine {
    #[must_use]
    pub fn new(arc_key: impl Into<String>, from: LatLng, to: LatLng, weight: f64, color: impl Into<String>) -> Self {
        Self::with_options(arc_key, from, to, weight, color, ArrowOptions::default())
    }

    #[must_use]
    pub fn with_options(
        arc_key: impl Into<String>,
        from: LatLng,
        to: LatLng,
        weight: f64,
        color: impl Into<String>,
        options: ArrowOptions,
    ) -> Self {
        Self {
            arc_key: arc_key.into(),
            from,
            to,
            weight,
            color: color.into(),
            opacity: 1.0,
            options: options.checked(),
            arrow: None,
        }
    }

    #[must_use]
    pub fn vertices(&self) -> [LatLng; 2] {
        [self.from, self.to]
    }

    /// View reset: rebuild everything derived from the projection
    pub fn redraw<P: Projection>(&mut self, projection: &P) -> Option<ArrowHead> {
        self.delete_marker();
        self.update_marker(projection)
    }

    /// Zoom start: the arrow is hidden until the zoom settles
    pub fn delete_marker(&mut self) {
        self.arrow = None;
    }

    /// Zoom/move end: recompute the arrow for the new view
    pub fn update_marker<P: Projection>(&mut self, projection: &P) -> Option<ArrowHead> {
        self.delete_marker();

        let start = projection.to_screen(self.from);
        let end = projection.to_screen(self.to);
        if !start.x.is_finite() || !start.y.is_finite() || !projection.contains(start) {
            return None;
        }

        let line_length = start.distance_to(end);
        let rotation_degrees = if line_length > f64::EPSILON {
            arrow_rotation((end.x - start.x) / line_length, (end.y - start.y) / line_length)
        } else {
            0.0
        };

        self.arrow = Some(ArrowHead {
            anchor: start,
            width: self.weight * self.options.width_coef,
            length: (line_length * self.options.length_part).min(self.options.max_length),
            rotation_degrees,
        });
        self.arrow
    }

    /// Restyle after a selection change; the arrow follows the line
    pub fn set_style<P: Projection>(&mut self, weight: f64, opacity: f64, projection: &P) -> Option<ArrowHead> {
        self.weight = weight;
        self.opacity = opacity;
        self.update_marker(projection)
    }
}
