use crate::constants::{MAX_MARKER_RADIUS, MAX_ROUTE_THICKNESS, MIN_MARKER_RADIUS, MIN_ROUTE_THICKNESS};
use serde::{Deserialize, Serialize};

/// How arcs are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteShape {
    #[default]
    Curved,
    Straight,
    /// Straight line with an arrowhead at the source end
    Pointy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutesSettings {
    pub arc_color: String,
    pub default_thickness: f64,
    pub min_thickness: Option<f64>,
    pub max_thickness: Option<f64>,
    pub shape: RouteShape,
}

impl Default for RoutesSettings {
    fn default() -> Self {
        Self {
            arc_color: "red".to_string(),
            default_thickness: 2.0,
            min_thickness: Some(1.0),
            max_thickness: Some(10.0),
            shape: RouteShape::Curved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkersSettings {
    pub marker_color: String,
    pub label_font_color: String,
    pub radius: f64,
    pub show_labels: bool,
}

impl Default for MarkersSettings {
    fn default() -> Self {
        Self {
            marker_color: "blue".to_string(),
            label_font_color: "black".to_string(),
            radius: 6.0,
            show_labels: true,
        }
    }
}

/// Color for one state bucket, plus bounds used when a row carries none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateSettings {
    pub state_color: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl StateSettings {
    #[must_use]
    pub fn new(state_color: &str) -> Self {
        Self {
            state_color: state_color.to_string(),
            min: None,
            max: None,
        }
    }
}

impl Default for StateSettings {
    fn default() -> Self {
        Self::new("red")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelsSettings {
    pub show_off_map_labels: bool,
    /// Inset from the viewport edge for off-map labels (px)
    pub edge_padding: f64,
}

impl Default for LabelsSettings {
    fn default() -> Self {
        Self {
            show_off_map_labels: true,
            edge_padding: 8.0,
        }
    }
}

/// Read-only configuration supplied by the host each update cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteMapSettings {
    pub routes: RoutesSettings,
    pub markers: MarkersSettings,
    pub state1: StateSettings,
    pub state2: StateSettings,
    pub state3: StateSettings,
    pub labels: LabelsSettings,
}

impl Default for RouteMapSettings {
    fn default() -> Self {
        Self {
            routes: RoutesSettings::default(),
            markers: MarkersSettings::default(),
            state1: StateSettings::new("red"),
            state2: StateSettings::new("yellow"),
            state3: StateSettings::new("green"),
            labels: LabelsSettings::default(),
        }
    }
}

impl RouteMapSettings {
    /// Parse a (possibly partial) settings document; missing fields take defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON for this shape
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse settings: {e}"))
    }

    /// Copy with radius and thickness values forced into their legal ranges
    #[must_use]
    pub fn clamped(&self) -> Self {
        let clamp_thickness = |value: f64| clamp_or(value, MIN_ROUTE_THICKNESS, MAX_ROUTE_THICKNESS);

        let mut settings = self.clone();
        settings.markers.radius = clamp_or(settings.markers.radius, MIN_MARKER_RADIUS, MAX_MARKER_RADIUS);
        settings.routes.default_thickness = clamp_thickness(settings.routes.default_thickness);
        settings.routes.min_thickness = settings.routes.min_thickness.map(clamp_thickness);
        settings.routes.max_thickness = settings.routes.max_thickness.map(clamp_thickness);
        settings.labels.edge_padding = settings.labels.edge_padding.max(0.0);
        settings
    }

    /// State bucket settings in classification order
    #[must_use]
    pub fn state_buckets(&self) -> [&StateSettings; 3] {
        [&self.state1, &self.state2, &self.state3]
    }
}

/// Clamp into [min, max]; NaN lands on `min`
fn clamp_or(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
