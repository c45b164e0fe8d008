pub mod columns;
pub mod csv;
mod directions;

// Re-export commonly used items
pub use columns::{format_cell, CellValue, ColumnRole, RouteTable, ValueColumn};
pub use self::csv::{parse_route_csv, CsvColumn};
pub use directions::build_directions;
