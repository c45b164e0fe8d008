use serde::{Deserialize, Serialize};

/// One cell of a host column. Nulls are `None` at the column level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric value; text cells are parsed leniently
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n).filter(|v| v.is_finite()),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Identity string for category cells (market, location codes)
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::Number(n) => format_plain(*n),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Role a value column plays in the direction builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    FromLatitude,
    FromLongitude,
    ToLatitude,
    ToLongitude,
    StateValue,
    StateValueMin1,
    StateValueMax1,
    StateValueMin2,
    StateValueMax2,
    StateValueMin3,
    StateValueMax3,
    ThicknessValue,
    ThicknessMin,
    ThicknessMax,
    /// Shown on the arc
    Tooltips,
    /// Shown on the origin marker
    SourceTooltips,
    /// Shown on the destination marker
    DestTooltips,
}

impl ColumnRole {
    pub const ALL: [Self; 17] = [
        Self::FromLatitude,
        Self::FromLongitude,
        Self::ToLatitude,
        Self::ToLongitude,
        Self::StateValue,
        Self::StateValueMin1,
        Self::StateValueMax1,
        Self::StateValueMin2,
        Self::StateValueMax2,
        Self::StateValueMin3,
        Self::StateValueMax3,
        Self::ThicknessValue,
        Self::ThicknessMin,
        Self::ThicknessMax,
        Self::Tooltips,
        Self::SourceTooltips,
        Self::DestTooltips,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FromLatitude => "fromLatitude",
            Self::FromLongitude => "fromLongitude",
            Self::ToLatitude => "toLatitude",
            Self::ToLongitude => "toLongitude",
            Self::StateValue => "stateValue",
            Self::StateValueMin1 => "stateValueMin1",
            Self::StateValueMax1 => "stateValueMax1",
            Self::StateValueMin2 => "stateValueMin2",
            Self::StateValueMax2 => "stateValueMax2",
            Self::StateValueMin3 => "stateValueMin3",
            Self::StateValueMax3 => "stateValueMax3",
            Self::ThicknessValue => "thicknessValue",
            Self::ThicknessMin => "thicknessMin",
            Self::ThicknessMax => "thicknessMax",
            Self::Tooltips => "tooltips",
            Self::SourceTooltips => "sourceTooltips",
            Self::DestTooltips => "destTooltips",
        }
    }

    /// Exact role name, case-insensitive
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|role| role.as_str().eq_ignore_ascii_case(name))
    }

    /// Min/max roles of one state bucket (0-based)
    #[must_use]
    pub const fn state_bucket(bucket: usize) -> Option<(Self, Self)> {
        match bucket {
            0 => Some((Self::StateValueMin1, Self::StateValueMax1)),
            1 => Some((Self::StateValueMin2, Self::StateValueMax2)),
            2 => Some((Self::StateValueMin3, Self::StateValueMax3)),
            _ => None,
        }
    }
}

/// A tagged value column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueColumn {
    pub display_name: String,
    pub roles: Vec<ColumnRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub values: Vec<Option<CellValue>>,
}

impl ValueColumn {
    #[must_use]
    pub fn new(display_name: impl Into<String>, roles: &[ColumnRole]) -> Self {
        Self {
            display_name: display_name.into(),
            roles: roles.to_vec(),
            format: None,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_role(&self, role: ColumnRole) -> bool {
        self.roles.contains(&role)
    }

    #[must_use]
    pub fn cell(&self, row: usize) -> Option<&CellValue> {
        self.values.get(row).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn number(&self, row: usize) -> Option<f64> {
        self.cell(row).and_then(CellValue::as_f64)
    }

    /// Cell text as shown in a tooltip
    #[must_use]
    pub fn formatted(&self, row: usize) -> String {
        format_cell(self.cell(row), self.format.as_deref())
    }
}

/// Parallel columns for one update cycle, as delivered by the host query
/// layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteTable {
    pub markets: Vec<Option<CellValue>>,
    pub from_locations: Vec<Option<CellValue>>,
    pub to_locations: Vec<Option<CellValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_names: Option<Vec<Option<CellValue>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_names: Option<Vec<Option<CellValue>>>,
    pub values: Vec<ValueColumn>,
}

impl RouteTable {
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON for this shape
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse route table: {e}"))
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.markets.len()
    }

    /// First column carrying `role`
    #[must_use]
    pub fn column(&self, role: ColumnRole) -> Option<&ValueColumn> {
        self.values.iter().find(|c| c.has_role(role))
    }

    /// All columns carrying `role`, in column order
    pub fn columns(&self, role: ColumnRole) -> impl Iterator<Item = &ValueColumn> {
        self.values.iter().filter(move |c| c.has_role(role))
    }

    #[must_use]
    pub fn number(&self, role: ColumnRole, row: usize) -> Option<f64> {
        self.column(role).and_then(|c| c.number(row))
    }
}

/// Key text of a category cell; empty when null
#[must_use]
pub fn category_key(column: &[Option<CellValue>], row: usize) -> Option<String> {
    column
        .get(row)
        .and_then(Option::as_ref)
        .map(CellValue::as_key)
        .filter(|key| !key.is_empty())
}

/// Format a cell for display.
///
/// Understands `0` and `0.00` (fixed decimals), `#,0` (thousands
/// separator) and a trailing `%` (value × 100). Other format strings fall
/// back to the plain rendering. Null cells render as the empty string.
#[must_use]
pub fn format_cell(cell: Option<&CellValue>, format: Option<&str>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    let CellValue::Number(value) = cell else {
        return cell.as_key();
    };
    let value = *value;
    if !value.is_finite() {
        return String::new();
    }

    let Some(format) = format.map(str::trim).filter(|f| !f.is_empty()) else {
        return format_plain(value);
    };

    let (pattern, percent) = match format.strip_suffix('%') {
        Some(pattern) => (pattern, true),
        None => (format, false),
    };
    if pattern.is_empty() || !pattern.chars().all(|c| matches!(c, '#' | '0' | ',' | '.')) {
        return format_plain(value);
    }

    let scaled = if percent { value * 100.0 } else { value };
    let decimals = pattern.split_once('.').map_or(0, |(_, frac)| frac.chars().filter(|&c| c == '0').count());
    let grouped = pattern.split_once('.').map_or(pattern, |(int, _)| int).contains(',');

    let mut text = format!("{scaled:.decimals$}");
    if grouped {
        text = group_thousands(&text);
    }
    if percent {
        text.push('%');
    }
    text
}

/// Shortest rendering: integers without a fraction, others as-is
fn format_plain(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
