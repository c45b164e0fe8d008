use super::columns::{CellValue, ColumnRole, RouteTable, ValueColumn};

/// What one CSV column feeds in the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvColumn {
    Market,
    FromLocation,
    ToLocation,
    FromName,
    ToName,
    Value(ColumnRole),
}

impl CsvColumn {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::FromLocation => "from",
            Self::ToLocation => "to",
            Self::FromName => "fromName",
            Self::ToName => "toName",
            Self::Value(role) => role.as_str(),
        }
    }
}

/// Detect the column kind from its header.
///
/// Exact role names win; otherwise a few common spellings are recognised.
/// Anything else becomes an arc tooltip column.
fn detect_column(header: &str) -> CsvColumn {
    if let Some(role) = ColumnRole::from_name(header) {
        return CsvColumn::Value(role);
    }

    let lower = header.trim().to_lowercase();
    let compact: String = lower.chars().filter(|c| c.is_alphanumeric()).collect();
    let is_origin = compact.starts_with("from") || compact.starts_with("origin") || compact.starts_with("source");
    let is_destination = compact.starts_with("dest")
        || compact.strip_prefix("to").is_some_and(|rest| {
            rest.is_empty() || ["lat", "lng", "lon", "name", "loc", "code", "airport", "city"].iter().any(|p| rest.starts_with(p))
        });

    if compact == "market" || compact == "route" || compact == "od" {
        return CsvColumn::Market;
    }
    if compact.contains("lat") {
        if is_origin {
            return CsvColumn::Value(ColumnRole::FromLatitude);
        }
        if is_destination {
            return CsvColumn::Value(ColumnRole::ToLatitude);
        }
    }
    if compact.contains("lng") || compact.contains("lon") {
        if is_origin {
            return CsvColumn::Value(ColumnRole::FromLongitude);
        }
        if is_destination {
            return CsvColumn::Value(ColumnRole::ToLongitude);
        }
    }
    if compact.contains("name") {
        if is_origin {
            return CsvColumn::FromName;
        }
        if is_destination {
            return CsvColumn::ToName;
        }
    }
    if is_origin {
        return CsvColumn::FromLocation;
    }
    if is_destination {
        return CsvColumn::ToLocation;
    }
    if compact == "state" || compact == "status" {
        return CsvColumn::Value(ColumnRole::StateValue);
    }
    if compact == "thickness" || compact == "weight" {
        return CsvColumn::Value(ColumnRole::ThicknessValue);
    }

    CsvColumn::Value(ColumnRole::Tooltips)
}

fn parse_cell(field: &str) -> Option<CellValue> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
        _ => Some(CellValue::Text(field.to_string())),
    }
}

/// Map each header to its column kind, in header order
#[must_use]
pub fn analyze_headers(headers: &csv::StringRecord) -> Vec<CsvColumn> {
    headers.iter().map(detect_column).collect()
}

/// Parse a flat CSV route table with a header row.
///
/// # Errors
///
/// Returns an error if the CSV cannot be read or a market/from/to column
/// cannot be identified from the headers
pub fn parse_route_csv(content: &str) -> Result<RouteTable, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read CSV headers: {e}"))?
        .clone();
    let kinds = analyze_headers(&headers);

    for required in [CsvColumn::Market, CsvColumn::FromLocation, CsvColumn::ToLocation] {
        if !kinds.contains(&required) {
            return Err(format!("CSV is missing a '{}' column", required.as_str()));
        }
    }

    let mut table = RouteTable::default();
    let mut value_slots: Vec<Option<usize>> = Vec::with_capacity(kinds.len());
    for (header, kind) in headers.iter().zip(&kinds) {
        match kind {
            CsvColumn::Value(role) => {
                value_slots.push(Some(table.values.len()));
                table.values.push(ValueColumn::new(header, &[*role]));
            }
            CsvColumn::FromName => {
                table.from_names.get_or_insert_with(Vec::new);
                value_slots.push(None);
            }
            CsvColumn::ToName => {
                table.to_names.get_or_insert_with(Vec::new);
                value_slots.push(None);
            }
            _ => value_slots.push(None),
        }
    }

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("Failed to read CSV row {}: {e}", line + 2))?;
        let mut seen = [false; 5];

        for (col_idx, kind) in kinds.iter().enumerate() {
            let cell = record.get(col_idx).and_then(parse_cell);
            let (target, slot) = match kind {
                CsvColumn::Market => (Some(&mut table.markets), 0),
                CsvColumn::FromLocation => (Some(&mut table.from_locations), 1),
                CsvColumn::ToLocation => (Some(&mut table.to_locations), 2),
                CsvColumn::FromName => (table.from_names.as_mut(), 3),
                CsvColumn::ToName => (table.to_names.as_mut(), 4),
                CsvColumn::Value(_) => {
                    let slot = value_slots.get(col_idx).copied().flatten();
                    if let Some(column) = slot.and_then(|i| table.values.get_mut(i)) {
                        column.values.push(cell);
                    }
                    continue;
                }
            };
            // first column of each kind wins
            if seen[slot] {
                continue;
            }
            seen[slot] = true;
            if let Some(target) = target {
                target.push(cell);
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::build_directions;

    const ROUTES: &str = "\
market,from,to,from_lat,from_lng,to_lat,to_lng,Flights
HND-LAX,HND,LAX,35.55,139.78,33.94,-118.41,NH 106
JFK-LHR,JFK,LHR,40.64,-73.78,51.47,-0.45,BA 112
BAD,XXX,YYY,,1,2,3,none
";

    #[test]
    fn test_detect_column_from_header() {
        assert_eq!(detect_column("Market"), CsvColumn::Market);
        assert_eq!(detect_column("Origin"), CsvColumn::FromLocation);
        assert_eq!(detect_column("Destination"), CsvColumn::ToLocation);
        assert_eq!(detect_column("from_lat"), CsvColumn::Value(ColumnRole::FromLatitude));
        assert_eq!(detect_column("Dest Longitude"), CsvColumn::Value(ColumnRole::ToLongitude));
        assert_eq!(detect_column("origin name"), CsvColumn::FromName);
        assert_eq!(detect_column("stateValueMax3"), CsvColumn::Value(ColumnRole::StateValueMax3));
        assert_eq!(detect_column("Carrier"), CsvColumn::Value(ColumnRole::Tooltips));
        assert_eq!(detect_column("Total seats"), CsvColumn::Value(ColumnRole::Tooltips));
    }

    #[test]
    fn test_parse_route_csv() {
        let table = parse_route_csv(ROUTES).expect("Should parse CSV");
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.values.len(), 5);
        assert_eq!(table.number(ColumnRole::ToLongitude, 1), Some(-0.45));
        assert_eq!(table.number(ColumnRole::FromLatitude, 2), None);
        assert_eq!(
            table.column(ColumnRole::Tooltips).and_then(|c| c.cell(0)),
            Some(&CellValue::from("NH 106"))
        );
    }

    #[test]
    fn test_csv_feeds_direction_builder() {
        let table = parse_route_csv(ROUTES).expect("Should parse CSV");
        let set = build_directions(&table);
        assert_eq!(set.directions.len(), 2);
        assert!(set.directions[0].path.from_shifted);
        assert_eq!(set.directions[1].tooltip_fields[0].value, "BA 112");
    }

    #[test]
    fn test_missing_location_column_is_an_error() {
        let err = parse_route_csv("market,from_lat\nA,1\n").expect_err("no from column");
        assert!(err.contains("'from'"));
    }
}
