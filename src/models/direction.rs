use crate::geometry::ResolvedPath;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One named, formatted value shown in a tooltip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipField {
    pub display_name: String,
    pub value: String,
}

impl TooltipField {
    #[must_use]
    pub fn new(display_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            value: value.into(),
        }
    }
}

/// Per-row [min, max] bounds of one state bucket. A missing side is open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl BucketBounds {
    #[must_use]
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

/// One origin-destination occurrence, built once per update cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    /// Arc identity
    pub market_key: String,
    /// Source row
    pub index: usize,
    pub from_location: String,
    pub to_location: String,
    /// Display names for the endpoint markers, when the host supplies them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_name: Option<String>,
    pub path: ResolvedPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_value: Option<f64>,
    #[serde(default)]
    pub state_buckets: [BucketBounds; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness_max: Option<f64>,
    #[serde(default)]
    pub tooltip_fields: Vec<TooltipField>,
}

impl Direction {
    /// Minimal direction with no state, thickness or tooltip data
    #[must_use]
    pub fn new(
        market_key: impl Into<String>,
        index: usize,
        from_location: impl Into<String>,
        to_location: impl Into<String>,
        path: ResolvedPath,
    ) -> Self {
        Self {
            market_key: market_key.into(),
            index,
            from_location: from_location.into(),
            to_location: to_location.into(),
            from_name: None,
            to_name: None,
            path,
            state_value: None,
            state_buckets: [BucketBounds::default(); 3],
            thickness_value: None,
            thickness_min: None,
            thickness_max: None,
            tooltip_fields: Vec::new(),
        }
    }

    /// Marker label for one endpoint: display name when present, else the code
    #[must_use]
    pub fn endpoint_label(&self, destination: bool) -> &str {
        let (name, code) = if destination {
            (&self.to_name, &self.to_location)
        } else {
            (&self.from_name, &self.from_location)
        };
        name.as_deref().filter(|n| !n.is_empty()).unwrap_or(code)
    }
}

/// Output of the direction builder for one update cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionSet {
    /// One direction per distinct market key, in first-occurrence order
    pub directions: Vec<Direction>,
    /// Source/destination tooltip fields per location code
    pub marker_tooltips: IndexMap<String, Vec<TooltipField>>,
}

impl DirectionSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    #[must_use]
    pub fn tooltips_for(&self, location: &str) -> &[TooltipField] {
        self.marker_tooltips.get(location).map_or(&[], Vec::as_slice)
    }
}
