//! Keyed and tabular scans.
//!
//! Each line across the orientation is one record. A record's first cell is
//! its key; the key cell also carries the fill sentinel in variable length
//! mode.

use crate::error::ExtractError;
use crate::scan::lines;
use crate::scan::values;
use crate::scan::Orientation;
use crate::scan::VALUE_FILL;
use crate::spreadsheet::cell::FillMarker;
use crate::spreadsheet::range::Rectangle;
use crate::spreadsheet::scalar::Scalar;
use crate::spreadsheet::scalar::Strictness;
use crate::spreadsheet::sheet::Sheet;
use indexmap::IndexMap;

/// Records keyed by the value of their first cell.
pub type KeyedTable = IndexMap<Scalar, IndexMap<String, Scalar>>;

/// Options of the keyed and record scans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableOptions {
    pub orientation: Orientation,
    /// Stop at the first record whose key is blank or carries an unexpected fill
    pub variable_length: bool,
    pub fill: FillMarker,
    /// Keep records with a blank key or without any data
    pub keep_empty: bool,
    /// Keep label/value pairs whose value is empty
    pub keep_empty_cells: bool,
    pub strictness: Strictness,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            orientation: Orientation::Rows,
            variable_length: false,
            fill: VALUE_FILL,
            keep_empty: false,
            keep_empty_cells: true,
            strictness: Strictness::default(),
        }
    }
}

enum Gate {
    Take,
    Skip,
    Stop,
}

/// Decides what to do with a line from its key cell.
fn gate(sheet: &Sheet, line: &[(u32, u32)], options: &TableOptions) -> Gate {
    let Some((col, row)) = line.first().copied() else {
        return Gate::Skip;
    };
    let key = sheet.value(col, row);
    if options.variable_length {
        if key.is_blank(options.strictness) || sheet.fill(col, row) != &options.fill {
            return Gate::Stop;
        }
    } else if !options.keep_empty && key.is_blank(options.strictness) {
        return Gate::Skip;
    }
    Gate::Take
}

fn all_blank(data: &[Scalar], strictness: Strictness) -> bool {
    data.iter().all(|value| value.is_blank(strictness))
}

/// Pairs values with labels; `None` labels are skipped and so are empty values unless kept.
fn label(labels: &[Option<&str>], data: &[Scalar], keep_empty_cells: bool) -> IndexMap<String, Scalar> {
    labels
        .iter()
        .zip(data)
        .filter_map(|(label, value)| label.map(|label| (label, value)))
        .filter(|(_, value)| keep_empty_cells || !value.is_empty())
        .map(|(label, value)| (label.to_owned(), value.clone()))
        .collect()
}

/// Reads records keyed by their first cell.
///
/// `labels[0]` names the key column and is not used; the remaining labels name
/// the data cells after the key. Unless `keep_empty` is set, records whose data
/// cells are all blank are dropped. A repeated key replaces the earlier record.
pub fn info(sheet: &Sheet, rect: &Rectangle, labels: &[Option<&str>], options: &TableOptions) -> Result<KeyedTable, ExtractError> {
    let mut result = KeyedTable::new();
    for line in lines(sheet, rect, options.orientation) {
        match gate(sheet, &line, options) {
            Gate::Stop => break,
            Gate::Skip => continue,
            Gate::Take => (),
        }
        let mut data = values(sheet, &line);
        let key = data.remove(0);
        if !options.keep_empty && all_blank(&data, options.strictness) {
            continue;
        }
        let record = label(labels.get(1..).unwrap_or_default(), &data, options.keep_empty_cells);
        result.insert(key, record);
    }
    Ok(result)
}

/// Reads records in order, labeling every cell of the line including the first.
///
/// Unless `keep_empty` is set, lines whose cells are all blank are dropped.
pub fn records(
    sheet: &Sheet,
    rect: &Rectangle,
    labels: &[Option<&str>],
    options: &TableOptions,
) -> Result<Vec<IndexMap<String, Scalar>>, ExtractError> {
    Ok(rows(sheet, rect, options)?
        .iter()
        .map(|data| label(labels, data, options.keep_empty_cells))
        .collect())
}

/// Reads unlabeled records in order with the same gating as [`records`].
pub fn rows(sheet: &Sheet, rect: &Rectangle, options: &TableOptions) -> Result<Vec<Vec<Scalar>>, ExtractError> {
    let mut result = Vec::new();
    for line in lines(sheet, rect, options.orientation) {
        match gate(sheet, &line, options) {
            Gate::Stop => break,
            Gate::Skip => continue,
            Gate::Take => (),
        }
        let data = values(sheet, &line);
        if !options.keep_empty && all_blank(&data, options.strictness) {
            continue;
        }
        result.push(data);
    }
    Ok(result)
}

/// Every value of `rect` as rows, without filtering.
pub fn tabular(sheet: &Sheet, rect: &Rectangle) -> Vec<Vec<Scalar>> {
    lines(sheet, rect, Orientation::Rows)
        .map(|line| values(sheet, &line))
        .collect()
}

/// Reads columns left to right until a column has fewer than `min_entries` non-blank cells.
///
/// The returned columns span `rect.min_row..=rect.max_row`; the short column
/// is not included.
pub fn expandable_column_table(sheet: &Sheet, rect: &Rectangle, min_entries: usize, strictness: Strictness) -> Vec<Vec<Scalar>> {
    let mut result = Vec::new();
    for line in lines(sheet, rect, Orientation::Columns) {
        let data = values(sheet, &line);
        if data.iter().filter(|value| !value.is_blank(strictness)).count() < min_entries {
            break;
        }
        result.push(data);
    }
    result
}
