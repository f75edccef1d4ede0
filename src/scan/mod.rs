//! # Region Scanners
//!
//! Turn rectangles of a [`Sheet`] grid into records: labeled pairs, flat lists,
//! keyed tables, raw grids, and coordinates found by sentinel search.
//!
//! Every scanner reads only cells inside its rectangle. Open maximum bounds are
//! closed at the sheet's data extent. Scans run in one forward pass and stop at
//! the first termination boundary they meet.

pub mod labeled;
pub mod list;
pub mod search;
pub mod table;

pub use labeled::labeled_values;
pub use labeled::resolve_formula_key;
pub use labeled::resolve_formula_keys;
pub use labeled::LabeledOptions;
pub use list::line;
pub use list::list;
pub use list::ListOptions;
pub use search::expect_labels;
pub use search::find_header_row;
pub use search::find_value;
pub use search::row_run_length;
pub use table::expandable_column_table;
pub use table::info;
pub use table::records;
pub use table::rows;
pub use table::tabular;
pub use table::KeyedTable;
pub use table::TableOptions;

use crate::spreadsheet::cell::FillMarker;
use crate::spreadsheet::range::Rectangle;
use crate::spreadsheet::scalar::Scalar;
use crate::spreadsheet::sheet::Sheet;
use thiserror::Error;

/// Fill marker of label cells in the audit template
pub const LABEL_FILL: FillMarker = FillMarker::Theme(0);

/// Fill marker of data entry cells in the audit template
pub const VALUE_FILL: FillMarker = FillMarker::Theme(8);

/// Errors raised when a sheet's layout differs from what a scan expects.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to find {what} in {rect}")]
    ScanFailure { what: String, rect: Rectangle },

    #[error("Mismatch in {what} labels: expected {expected:?}, found {found:?}")]
    LabelMismatch {
        what: String,
        expected: Vec<Option<String>>,
        found: Vec<Scalar>,
    },

    #[error("Missing required {0}")]
    MissingRequired(String),
}

/// Whether records run along rows or along columns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// One record per row, fields left to right
    #[default]
    Rows,
    /// One record per column, fields top to bottom
    Columns,
}

/// Unit system used to resolve unit formulas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnitSystem {
    /// Inch-pound units
    #[default]
    Ip,
    /// International System units
    Si,
}

impl UnitSystem {
    /// Picks the literal belonging to this system.
    pub fn pick<'a>(&self, ip: &'a str, si: &'a str) -> &'a str {
        match self {
            UnitSystem::Ip => ip,
            UnitSystem::Si => si,
        }
    }
}

/// Builds a label list in which every label is present.
pub fn labels<'a>(names: &[&'a str]) -> Vec<Option<&'a str>> {
    names.iter().map(|name| Some(*name)).collect()
}

/// Coordinates of every line of `rect`, each line running across the orientation.
///
/// For `Rows` each line is one row from `min_col` to `max_col`; for `Columns`
/// each line is one column from `min_row` to `max_row`. Open bounds are closed
/// at the sheet extent.
pub(crate) fn lines(sheet: &Sheet, rect: &Rectangle, orientation: Orientation) -> impl Iterator<Item = Vec<(u32, u32)>> {
    let (min_col, max_col) = (rect.min_col, rect.max_col_or(sheet.max_col()));
    let (min_row, max_row) = (rect.min_row, rect.max_row_or(sheet.max_row()));
    let (outer, inner) = match orientation {
        Orientation::Rows => (min_row..=max_row, min_col..=max_col),
        Orientation::Columns => (min_col..=max_col, min_row..=max_row),
    };
    outer.map(move |major| {
        inner
            .clone()
            .map(|minor| match orientation {
                Orientation::Rows => (minor, major),
                Orientation::Columns => (major, minor),
            })
            .collect()
    })
}

/// Values at the given coordinates.
pub(crate) fn values(sheet: &Sheet, line: &[(u32, u32)]) -> Vec<Scalar> {
    line.iter().map(|(col, row)| sheet.value(*col, *row).clone()).collect()
}
