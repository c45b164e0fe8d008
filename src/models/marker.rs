use super::direction::TooltipField;
use crate::constants::SELECTED_OPACITY;
use crate::geometry::LatLng;
use serde::{Deserialize, Serialize};

/// A location on the map. Arcs touching it are the incident edges in the
/// route graph; the marker itself holds no arc list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique key; the location code, or `<code>_360` for a shifted twin
    pub key: String,
    /// Location code shared by both instances of a shifted location
    pub location: String,
    pub label: String,
    pub point: LatLng,
    /// Longitude was shifted by -360 for antimeridian routing
    pub shifted: bool,
    pub is_selected: bool,
    pub opacity: f64,
    #[serde(default)]
    pub tooltip_fields: Vec<TooltipField>,
}

impl Marker {
    #[must_use]
    pub fn new(location: impl Into<String>, label: impl Into<String>, point: LatLng, shifted: bool) -> Self {
        let location = location.into();
        Self {
            key: location.clone(),
            location,
            label: label.into(),
            point,
            shifted,
            is_selected: false,
            opacity: SELECTED_OPACITY,
            tooltip_fields: Vec::new(),
        }
    }
}
