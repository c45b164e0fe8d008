use super::direction::TooltipField;
use crate::constants::SELECTED_OPACITY;
use crate::geometry::ArcShape;
use serde::{Deserialize, Serialize};

/// Opaque selection identity minted by the host for one arc
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionToken(pub String);

impl SelectionToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SelectionToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Mints selection tokens for arcs during a graph build
pub trait SelectionTokenSource {
    fn token_for(&self, market_key: &str, row: usize) -> SelectionToken;
}

/// Default token source: `market#row`
#[derive(Debug, Clone, Copy, Default)]
pub struct RowTokens;

impl SelectionTokenSource for RowTokens {
    fn token_for(&self, market_key: &str, row: usize) -> SelectionToken {
        SelectionToken(format!("{market_key}#{row}"))
    }
}

impl<F> SelectionTokenSource for F
where
    F: Fn(&str, usize) -> SelectionToken,
{
    fn token_for(&self, market_key: &str, row: usize) -> SelectionToken {
        self(market_key, row)
    }
}

/// One route between two markers. Its endpoints are the edge endpoints in
/// the route graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteArc {
    /// Market key
    pub key: String,
    /// Source row of the first occurrence
    pub index: usize,
    pub shape: ArcShape,
    pub color: String,
    pub width: f64,
    pub is_selected: bool,
    pub opacity: f64,
    pub selection_token: SelectionToken,
    #[serde(default)]
    pub tooltip_fields: Vec<TooltipField>,
}

impl RouteArc {
    #[must_use]
    pub fn new(key: impl Into<String>, index: usize, shape: ArcShape, selection_token: SelectionToken) -> Self {
        Self {
            key: key.into(),
            index,
            shape,
            color: String::new(),
            width: 0.0,
            is_selected: false,
            opacity: SELECTED_OPACITY,
            selection_token,
            tooltip_fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_tokens_format() {
        assert_eq!(RowTokens.token_for("LAX-JFK", 3), SelectionToken::from("LAX-JFK#3"));
    }

    #[test]
    fn test_closure_token_source() {
        let source = |market: &str, _row: usize| SelectionToken(market.to_lowercase());
        assert_eq!(source.token_for("AB", 0).as_str(), "ab");
    }
}
