use super::columns::{category_key, CellValue, ColumnRole, RouteTable, ValueColumn};
use crate::geometry::resolve_shortest_path;
use crate::logging::log;
use crate::models::{BucketBounds, Direction, DirectionSet, TooltipField};
use indexmap::IndexMap;

/// Zip each column's display name with its formatted value at `row`,
/// preserving column order
fn tooltip_fields<'a>(columns: impl Iterator<Item = &'a ValueColumn>, row: usize) -> Vec<TooltipField> {
    columns
        .map(|column| TooltipField::new(column.display_name.clone(), column.formatted(row)))
        .collect()
}

fn optional_name(names: Option<&Vec<Option<CellValue>>>, row: usize) -> Option<String> {
    names.and_then(|column| category_key(column, row))
}

/// Whether the key columns carry rows and every coordinate role has a column
fn has_required_columns(table: &RouteTable) -> bool {
    let categories_present =
        !table.markets.is_empty() && !table.from_locations.is_empty() && !table.to_locations.is_empty();
    let coordinates_present = [
        ColumnRole::FromLatitude,
        ColumnRole::FromLongitude,
        ColumnRole::ToLatitude,
        ColumnRole::ToLongitude,
    ]
    .into_iter()
    .all(|role| table.column(role).is_some());

    categories_present && coordinates_present
}

/// Turn one update cycle's columns into directions.
///
/// Rows missing a key or a coordinate are skipped. Rows sharing a market key
/// merge into the first one: its geometry, state and thickness win and later
/// rows append their tooltip fields. Source/destination tooltip columns are
/// collected per location code in row order. A table whose key columns are
/// empty or which lacks a coordinate column yields an empty set.
#[must_use]
pub fn build_directions(table: &RouteTable) -> DirectionSet {
    if !has_required_columns(table) {
        log!("Route table is missing required columns; rendering nothing");
        return DirectionSet::default();
    }

    let mut directions: IndexMap<String, Direction> = IndexMap::new();
    let mut marker_tooltips: IndexMap<String, Vec<TooltipField>> = IndexMap::new();
    let mut skipped = 0usize;

    for row in 0..table.row_count() {
        let (Some(market), Some(from), Some(to)) = (
            category_key(&table.markets, row),
            category_key(&table.from_locations, row),
            category_key(&table.to_locations, row),
        ) else {
            skipped += 1;
            continue;
        };

        marker_tooltips
            .entry(from.clone())
            .or_default()
            .extend(tooltip_fields(table.columns(ColumnRole::SourceTooltips), row));
        marker_tooltips
            .entry(to.clone())
            .or_default()
            .extend(tooltip_fields(table.columns(ColumnRole::DestTooltips), row));

        let Some(path) = resolve_shortest_path(
            table.number(ColumnRole::FromLatitude, row),
            table.number(ColumnRole::FromLongitude, row),
            table.number(ColumnRole::ToLatitude, row),
            table.number(ColumnRole::ToLongitude, row),
        ) else {
            skipped += 1;
            continue;
        };

        let fields = tooltip_fields(table.columns(ColumnRole::Tooltips), row);
        if let Some(existing) = directions.get_mut(&market) {
            existing.tooltip_fields.extend(fields);
            continue;
        }

        let mut direction = Direction::new(market.clone(), row, from, to, path);
        direction.from_name = optional_name(table.from_names.as_ref(), row);
        direction.to_name = optional_name(table.to_names.as_ref(), row);
        direction.state_value = table.number(ColumnRole::StateValue, row);
        for (bucket, bounds) in direction.state_buckets.iter_mut().enumerate() {
            if let Some((min_role, max_role)) = ColumnRole::state_bucket(bucket) {
                *bounds = BucketBounds::new(table.number(min_role, row), table.number(max_role, row));
            }
        }
        direction.thickness_value = table.number(ColumnRole::ThicknessValue, row);
        direction.thickness_min = table.number(ColumnRole::ThicknessMin, row);
        direction.thickness_max = table.number(ColumnRole::ThicknessMax, row);
        direction.tooltip_fields = fields;
        directions.insert(market, direction);
    }

    marker_tooltips.retain(|_, fields| !fields.is_empty());

    if skipped > 0 {
        log!("Skipped {} incomplete route rows", skipped);
    }

    DirectionSet {
        directions: directions.into_values().collect(),
        marker_tooltips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_column(values: &[&str]) -> Vec<Option<CellValue>> {
        values.iter().map(|v| Some(CellValue::from(*v))).collect()
    }

    fn number_column(name: &str, role: ColumnRole, values: &[Option<f64>]) -> ValueColumn {
        let mut column = ValueColumn::new(name, &[role]);
        column.values = values.iter().map(|v| v.map(CellValue::Number)).collect();
        column
    }

    fn table() -> RouteTable {
        RouteTable {
            markets: text_column(&["A-B", "A-C", "A-B"]),
            from_locations: text_column(&["A", "A", "A"]),
            to_locations: text_column(&["B", "C", "B"]),
            from_names: None,
            to_names: None,
            values: vec![
                number_column("From Lat", ColumnRole::FromLatitude, &[Some(10.0), Some(10.0), Some(10.0)]),
                number_column("From Lng", ColumnRole::FromLongitude, &[Some(10.0), Some(10.0), Some(10.0)]),
                number_column("To Lat", ColumnRole::ToLatitude, &[Some(20.0), None, Some(20.0)]),
                number_column("To Lng", ColumnRole::ToLongitude, &[Some(30.0), Some(40.0), Some(30.0)]),
                number_column("Flight", ColumnRole::Tooltips, &[Some(100.0), Some(200.0), Some(300.0)]),
            ],
        }
    }

    #[test]
    fn test_incomplete_rows_are_skipped() {
        let set = build_directions(&table());
        let markets: Vec<&str> = set.directions.iter().map(|d| d.market_key.as_str()).collect();
        assert_eq!(markets, vec!["A-B"]);
    }

    #[test]
    fn test_duplicate_markets_merge_tooltips() {
        let set = build_directions(&table());
        let direction = &set.directions[0];
        assert_eq!(direction.index, 0);
        let values: Vec<&str> = direction.tooltip_fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["100", "300"]);
        assert!(direction.tooltip_fields.iter().all(|f| f.display_name == "Flight"));
    }

    #[test]
    fn test_state_and_thickness_columns() {
        let mut input = table();
        input.values.push(number_column("State", ColumnRole::StateValue, &[Some(0.5), None, None]));
        input.values.push(number_column("Min 2", ColumnRole::StateValueMin2, &[Some(0.0), None, None]));
        input.values.push(number_column("Max 2", ColumnRole::StateValueMax2, &[Some(1.0), None, None]));
        input.values.push(number_column("Seats", ColumnRole::ThicknessValue, &[Some(50.0), None, None]));

        let set = build_directions(&input);
        let direction = &set.directions[0];
        assert_eq!(direction.state_value, Some(0.5));
        assert_eq!(direction.state_buckets[0], BucketBounds::default());
        assert_eq!(direction.state_buckets[1], BucketBounds::new(Some(0.0), Some(1.0)));
        assert_eq!(direction.thickness_value, Some(50.0));
        assert_eq!(direction.thickness_min, None);
    }

    #[test]
    fn test_marker_tooltips_by_location() {
        let mut input = table();
        input.values.push(number_column("Departures", ColumnRole::SourceTooltips, &[Some(1.0), Some(2.0), Some(3.0)]));
        input.values.push(number_column("Arrivals", ColumnRole::DestTooltips, &[Some(7.0), Some(8.0), Some(9.0)]));

        let set = build_directions(&input);
        let departures: Vec<&str> = set.tooltips_for("A").iter().map(|f| f.value.as_str()).collect();
        assert_eq!(departures, vec!["1", "2", "3"]);
        let arrivals: Vec<&str> = set.tooltips_for("B").iter().map(|f| f.value.as_str()).collect();
        assert_eq!(arrivals, vec!["7", "9"]);
        assert_eq!(set.tooltips_for("C").len(), 1);
    }

    #[test]
    fn test_display_names() {
        let mut input = table();
        input.from_names = Some(text_column(&["Alpha", "Alpha", "Alpha"]));
        let set = build_directions(&input);
        assert_eq!(set.directions[0].endpoint_label(false), "Alpha");
        assert_eq!(set.directions[0].endpoint_label(true), "B");
    }

    #[test]
    fn test_missing_required_column_yields_empty_set() {
        let mut input = table();
        input.values.retain(|c| !c.has_role(ColumnRole::ToLongitude));
        assert!(build_directions(&input).is_empty());

        let mut input = table();
        input.from_locations.clear();
        assert!(build_directions(&input).is_empty());

        assert!(build_directions(&RouteTable::default()).is_empty());
    }

    #[test]
    fn test_null_key_in_first_row_only_skips_that_row() {
        let mut input = table();
        input.markets[0] = None;
        input.markets[1] = Some(CellValue::from("A-D"));
        input.to_locations[1] = Some(CellValue::from("D"));
        input.values[2].values[1] = Some(CellValue::Number(25.0));

        let set = build_directions(&input);
        let markets: Vec<&str> = set.directions.iter().map(|d| d.market_key.as_str()).collect();
        assert_eq!(markets, vec!["A-D", "A-B"]);
        assert_eq!(set.directions[1].index, 2);
    }
}
