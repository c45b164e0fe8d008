//! Color and stroke width classification for arcs.

use crate::constants::SLOPE_EPSILON;
use crate::models::{BucketBounds, Direction, RouteMapSettings, RoutesSettings};

/// Whether `value` falls inside a resolved bucket.
///
/// A bucket with `min == -max` counts as unconfigured and never matches;
/// this keeps an all-zero or fully open default bucket from claiming every
/// value.
fn bucket_matches(value: f64, min: f64, max: f64) -> bool {
    value <= max && value >= min && min != -max
}

/// Color for a state value: first matching bucket in order 1, 2, 3, else the
/// default route color.
///
/// Row bounds take precedence over the bucket's configured fallback bounds;
/// a side missing from both is open (`±f64::MAX`).
#[must_use]
pub fn state_color<'a>(
    value: Option<f64>,
    row_buckets: &[BucketBounds; 3],
    settings: &'a RouteMapSettings,
) -> &'a str {
    let Some(value) = value.filter(|v| !v.is_nan()) else {
        return &settings.routes.arc_color;
    };

    for (row, bucket) in row_buckets.iter().zip(settings.state_buckets()) {
        let min = row.min.or(bucket.min).unwrap_or(-f64::MAX);
        let max = row.max.or(bucket.max).unwrap_or(f64::MAX);
        if bucket_matches(value, min, max) {
            return &bucket.state_color;
        }
    }

    &settings.routes.arc_color
}

/// Color of the arc drawn for `direction`
#[must_use]
pub fn route_color<'a>(direction: &Direction, settings: &'a RouteMapSettings) -> &'a str {
    state_color(direction.state_value, &direction.state_buckets, settings)
}

/// Linear mapping from data values to stroke widths, computed once per
/// dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThicknessScale {
    pub data_min: f64,
    pub data_max: f64,
    pub min_thickness: f64,
    pub coefficient: f64,
}

impl ThicknessScale {
    /// Scale spanning the declared thickness ranges of every direction.
    ///
    /// `None` when min/max thickness are not both configured, no direction
    /// declares a range, or the range is empty (all values equal).
    #[must_use]
    pub fn for_dataset<'a, I>(directions: I, routes: &RoutesSettings) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Direction>,
    {
        let (Some(min_thickness), Some(max_thickness)) = (routes.min_thickness, routes.max_thickness) else {
            return None;
        };

        let mut data_min: Option<f64> = None;
        let mut data_max: Option<f64> = None;
        for direction in directions {
            if let Some(min) = direction.thickness_min.filter(|v| v.is_finite()) {
                data_min = Some(data_min.map_or(min, |m| m.min(min)));
            }
            if let Some(max) = direction.thickness_max.filter(|v| v.is_finite()) {
                data_max = Some(data_max.map_or(max, |m| m.max(max)));
            }
        }

        Self::new(data_min?, data_max?, min_thickness, max_thickness)
    }

    /// Scale for an explicit data range; `None` when the range is empty
    #[must_use]
    pub fn new(data_min: f64, data_max: f64, min_thickness: f64, max_thickness: f64) -> Option<Self> {
        let denominator = data_max - data_min;
        if denominator.abs() < SLOPE_EPSILON || !denominator.is_finite() {
            return None;
        }

        let coefficient = (max_thickness - min_thickness) / denominator;
        if !coefficient.is_finite() {
            return None;
        }

        Some(Self {
            data_min,
            data_max,
            min_thickness,
            coefficient,
        })
    }

    #[must_use]
    pub fn width(&self, value: f64) -> f64 {
        self.min_thickness + (value - self.data_min) * self.coefficient
    }
}

/// Stroke width of the arc drawn for `direction`.
///
/// Scaled when a dataset scale exists and the row's thickness value lies in
/// its own declared range; the default thickness otherwise.
#[must_use]
pub fn route_width(direction: &Direction, scale: Option<&ThicknessScale>, routes: &RoutesSettings) -> f64 {
    let (Some(scale), Some(value), Some(min), Some(max)) = (
        scale,
        direction.thickness_value,
        direction.thickness_min,
        direction.thickness_max,
    ) else {
        return routes.default_thickness;
    };

    if value < min || value > max {
        return routes.default_thickness;
    }

    let width = scale.width(value);
    if width.is_finite() {
        width
    } else {
        routes.default_thickness
    }
}
