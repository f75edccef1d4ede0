//! Label/value pair scans.
//!
//! The first line of cells across the rectangle holds labels and the last holds
//! values. In units mode the line right after the value line holds a unit,
//! which is folded into the key as `label (unit)`.

use crate::error::ExtractError;
use crate::scan::Orientation;
use crate::scan::UnitSystem;
use crate::scan::LABEL_FILL;
use crate::scan::VALUE_FILL;
use crate::spreadsheet::cell::FillMarker;
use crate::spreadsheet::range::Rectangle;
use crate::spreadsheet::scalar::Scalar;
use crate::spreadsheet::sheet::Sheet;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

/// Options of [`labeled_values`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledOptions {
    /// `Rows`: labels in the first column, values in the last; `Columns`: first and last row
    pub orientation: Orientation,
    /// Stop at the first pair whose label or value cell carries an unexpected fill
    pub variable_length: bool,
    pub label_fill: FillMarker,
    pub value_fill: FillMarker,
    /// Units mode: read a unit after the value line and resolve unit formulas for this system
    pub units: Option<UnitSystem>,
}

impl Default for LabeledOptions {
    fn default() -> Self {
        LabeledOptions {
            orientation: Orientation::Rows,
            variable_length: false,
            label_fill: LABEL_FILL,
            value_fill: VALUE_FILL,
            units: None,
        }
    }
}

/// Reads label/value pairs from `rect`.
///
/// Pairs where the label or the value cell is empty are skipped. In variable
/// length mode the scan ends before the first remaining pair whose label or
/// value fill differs from the expected markers.
pub fn labeled_values(sheet: &Sheet, rect: &Rectangle, options: &LabeledOptions) -> Result<IndexMap<String, Scalar>, ExtractError> {
    let (first, last) = match options.orientation {
        Orientation::Rows => (rect.min_row, rect.max_row_or(sheet.max_row())),
        Orientation::Columns => (rect.min_col, rect.max_col_or(sheet.max_col())),
    };
    let (label_line, value_line) = match options.orientation {
        Orientation::Rows => (rect.min_col, rect.max_col_or(sheet.max_col())),
        Orientation::Columns => (rect.min_row, rect.max_row_or(sheet.max_row())),
    };
    let at = |line: u32, index: u32| match options.orientation {
        Orientation::Rows => (line, index),
        Orientation::Columns => (index, line),
    };

    let mut result = IndexMap::new();
    for index in first..=last {
        let (label_col, label_row) = at(label_line, index);
        let (value_col, value_row) = at(value_line, index);
        let label = sheet.value(label_col, label_row);
        let value = sheet.value(value_col, value_row);
        if label.is_empty() || value.is_empty() {
            continue;
        }
        if options.variable_length
            && (sheet.fill(label_col, label_row) != &options.label_fill
                || sheet.fill(value_col, value_row) != &options.value_fill)
        {
            break;
        }

        let key = match options.units {
            Some(system) => {
                let unit = match value_line.checked_add(1) {
                    Some(unit_line) => {
                        let (unit_col, unit_row) = at(unit_line, index);
                        sheet.value(unit_col, unit_row).clone()
                    }
                    None => Scalar::Empty,
                };
                match &unit {
                    Scalar::Empty => label.to_string(),
                    unit => format!("{} ({})", label.to_string().trim_end(), resolve_unit(unit, system)),
                }
            }
            None => label.to_string(),
        };
        result.insert(key, value.clone());
    }
    Ok(result)
}

/// `=IF(<condition>,"<ip>","<si>")`
fn unit_formula() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^=\s*IF\s*\([^,]*,\s*"([^"]*)"\s*,\s*"([^"]*)"\s*\)\s*$"#).expect("Hardcode regex pattern")
    })
}

/// `="<text>"&IF(<condition>,"<ip>","<si>")`
fn key_formula() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^=(.*?)&\s*IF\s*\([^,]*,\s*"([^"]*)"\s*,\s*"([^"]*)"\s*\)\s*$"#).expect("Hardcode regex pattern")
    })
}

/// Text of a unit cell, with a unit-selecting `IF` formula replaced by the literal for `system`.
fn resolve_unit(unit: &Scalar, system: UnitSystem) -> String {
    let text = unit.to_string();
    match unit_formula().captures(&text) {
        Some(captures) => system.pick(&captures[1], &captures[2]).to_owned(),
        None => text,
    }
}

/// Rewrites a label formula that appends a unit selector to literal text.
///
/// `="Roof area "&IF(Instructions!B18="IP","(ft2)","m2")` becomes
/// `Roof area (ft2)` for IP and `Roof area (m2)` for SI. Anything else is
/// returned unchanged.
pub fn resolve_formula_key(key: &str, system: UnitSystem) -> String {
    let Some(captures) = key_formula().captures(key) else {
        return key.to_owned();
    };
    let text = captures[1].replace('"', "");
    let unit = system.pick(&captures[2], &captures[3]);
    let unit = unit.trim().trim_start_matches('(').trim_end_matches(')');
    format!("{} ({unit})", text.trim())
}

/// Applies [`resolve_formula_key`] to every key starting with `=`, keeping key order.
pub fn resolve_formula_keys(pairs: IndexMap<String, Scalar>, system: UnitSystem) -> IndexMap<String, Scalar> {
    pairs
        .into_iter()
        .map(|(key, value)| {
            if key.starts_with('=') {
                (resolve_formula_key(&key, system), value)
            } else {
                (key, value)
            }
        })
        .collect()
}
