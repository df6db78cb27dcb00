//! FILENAME: layout-engine/src/grid.rs
//! Grid - the tabulated output of one flattened response.
//!
//! Storage is sparse: a mapping from column key to the rows recorded for
//! that column. Most columns are touched by a minority of rows once
//! repeatable sections are involved, so a dense matrix would mostly hold
//! blanks. Column order is fixed at construction from the export schema and
//! drives the order of the materialized rows.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// The sparse column -> row -> value result of tabulating a response.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    /// The registered export columns, in header order.
    columns: Vec<String>,

    /// Recorded cells, keyed by column then by 0-based row.
    cells: FxHashMap<String, FxHashMap<u32, String>>,
}

impl Grid {
    /// Creates a grid with the given registered columns. Only these columns
    /// accept data; anything else recorded later is dropped.
    pub fn new(columns: Vec<String>) -> Self {
        let cells = columns
            .iter()
            .map(|column| (column.clone(), FxHashMap::default()))
            .collect();
        Grid { columns, cells }
    }

    /// The registered columns, in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the given column is registered.
    pub fn has_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// Records one cell. Unregistered columns are silently dropped.
    ///
    /// A correct layout never writes the same cell twice; a collision here
    /// means the row assignment upstream is broken, so debug builds assert.
    pub fn record(&mut self, column: &str, row: u32, value: String) {
        if let Some(rows) = self.cells.get_mut(column) {
            let previous = rows.insert(row, value);
            debug_assert!(
                previous.is_none(),
                "cell ({}, {}) written twice",
                column,
                row
            );
        }
    }

    /// Reads one cell, `None` if nothing was recorded there.
    pub fn value(&self, column: &str, row: u32) -> Option<&str> {
        self.cells
            .get(column)
            .and_then(|rows| rows.get(&row))
            .map(String::as_str)
    }

    /// The highest recorded row index, `None` if the grid holds no data.
    pub fn max_row(&self) -> Option<u32> {
        self.cells
            .values()
            .flat_map(|rows| rows.keys().copied())
            .max()
    }

    /// Materializes the grid as ordered rows, one string per column, with
    /// `""` for cells that were never recorded.
    ///
    /// A grid with no data still yields exactly one blank row: every
    /// exported response produces at least one line of output. This is a
    /// deliberate special case, not a consequence of the row count.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let last_row = self.max_row().unwrap_or(0);
        (0..=last_row)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| self.value(column, row).unwrap_or_default().to_string())
                    .collect()
            })
            .collect()
    }

    /// Forgets all recorded cells while keeping the registered columns, so
    /// the grid can be reused for the next response of the same schema.
    pub fn clear_rows(&mut self) {
        for rows in self.cells.values_mut() {
            rows.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: &[&str]) -> Grid {
        Grid::new(columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn records_and_reads_cells() {
        let mut grid = grid(&["q1", "q2"]);
        grid.record("q1", 0, "a".to_string());
        grid.record("q2", 3, "b".to_string());

        assert_eq!(grid.value("q1", 0), Some("a"));
        assert_eq!(grid.value("q2", 3), Some("b"));
        assert_eq!(grid.value("q2", 0), None);
        assert_eq!(grid.max_row(), Some(3));
    }

    #[test]
    fn drops_unregistered_columns() {
        let mut grid = grid(&["q1"]);
        grid.record("unknown", 0, "x".to_string());

        assert!(!grid.has_column("unknown"));
        assert_eq!(grid.max_row(), None);
    }

    #[test]
    fn materializes_rows_with_blanks() {
        let mut grid = grid(&["q1", "q2"]);
        grid.record("q1", 0, "a".to_string());
        grid.record("q2", 2, "b".to_string());

        let rows = grid.rows();
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "".to_string()],
                vec!["".to_string(), "".to_string()],
                vec!["".to_string(), "b".to_string()],
            ]
        );
    }

    #[test]
    fn empty_grid_yields_one_blank_row() {
        let grid = grid(&["q1", "q2"]);
        assert_eq!(grid.max_row(), None);
        assert_eq!(grid.rows(), vec![vec!["".to_string(), "".to_string()]]);
    }

    #[test]
    fn clear_rows_keeps_columns() {
        let mut grid = grid(&["q1"]);
        grid.record("q1", 1, "a".to_string());
        grid.clear_rows();

        assert!(grid.has_column("q1"));
        assert_eq!(grid.max_row(), None);
        assert_eq!(grid.rows(), vec![vec!["".to_string()]]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "written twice")]
    fn double_write_asserts_in_debug() {
        let mut grid = grid(&["q1"]);
        grid.record("q1", 0, "a".to_string());
        grid.record("q1", 0, "b".to_string());
    }
}
