//! Anchored searches used to locate regions whose position drifts between template versions.

use crate::error::ExtractError;
use crate::scan::list::line;
use crate::scan::lines;
use crate::scan::Orientation;
use crate::scan::ScanError;
use crate::spreadsheet::range::Rectangle;
use crate::spreadsheet::scalar::Scalar;
use crate::spreadsheet::scalar::Strictness;
use crate::spreadsheet::sheet::Sheet;
use log::debug;

/// Finds the first cell in row-major order whose value equals `target`.
///
/// Returns its 1-based `(col, row)`; fails with `ScanFailure` when the
/// rectangle is exhausted.
pub fn find_value(sheet: &Sheet, rect: &Rectangle, target: &Scalar) -> Result<(u32, u32), ExtractError> {
    for line in lines(sheet, rect, Orientation::Rows) {
        if let Some((col, row)) = line.into_iter().find(|(col, row)| sheet.value(*col, *row) == target) {
            debug!("Found '{target}' at ({col}, {row}) of '{}'", sheet.name());
            return Ok((col, row));
        }
    }
    Err(ScanError::ScanFailure {
        what: format!("cell value '{target}'"),
        rect: *rect,
    })?
}

/// Finds the first row at or below `min_row` whose cells from `min_col` equal `header`.
pub fn find_header_row(sheet: &Sheet, min_col: u32, min_row: u32, header: &[&str]) -> Result<u32, ExtractError> {
    let width = header.len().max(1) as u32;
    let rect = Rectangle::open(min_col, min_row, Some(min_col.saturating_add(width - 1)), None);
    for line in lines(sheet, &rect, Orientation::Rows) {
        let matches = line.len() == header.len()
            && line
                .iter()
                .zip(header)
                .all(|((col, row), label)| sheet.value(*col, *row).matches_label(Some(label)));
        if matches {
            if let Some((_, row)) = line.first() {
                return Ok(*row);
            }
        }
    }
    Err(ScanError::ScanFailure {
        what: format!("header {header:?}"),
        rect,
    })?
}

/// Reads the labels of a single row or column and checks them against `expected`.
///
/// An expected `None` only matches an empty cell. Fails with `LabelMismatch`
/// naming `what` when any label differs.
pub fn expect_labels(sheet: &Sheet, rect: &Rectangle, expected: &[Option<&str>], what: &str) -> Result<Vec<Scalar>, ExtractError> {
    let found = line(sheet, rect)?;
    let matches = found.len() == expected.len()
        && found
            .iter()
            .zip(expected)
            .all(|(value, label)| value.matches_label(*label));
    if matches {
        Ok(found)
    } else {
        Err(ScanError::LabelMismatch {
            what: what.to_owned(),
            expected: expected.iter().map(|label| label.map(str::to_owned)).collect(),
            found,
        })?
    }
}

/// Number of consecutive non-blank cells in `row` starting at `col`.
pub fn row_run_length(sheet: &Sheet, col: u32, row: u32, strictness: Strictness) -> u32 {
    (col..=sheet.max_col())
        .take_while(|col| !sheet.value(*col, row).is_blank(strictness))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::tests::grid;
    use crate::scan::tests::number;
    use crate::scan::tests::text;

    #[test]
    fn header_row() -> Result<(), ExtractError> {
        let sheet = grid(&[
            &[text("X"), text("Y")],
            &[text("ID"), text("Name")],
            &[number(1.0), text("a")],
        ]);
        assert_eq!(find_header_row(&sheet, 1, 1, &["ID", "Name"])?, 2);

        let result = find_header_row(&sheet, 1, 1, &["ID", "Other"]);
        assert!(matches!(
            result.as_ref().map_err(ExtractError::as_scan_error),
            Err(Some(ScanError::ScanFailure { .. }))
        ));
        assert!(find_header_row(&sheet, 1, 3, &["ID", "Name"]).is_err());
        Ok(())
    }

    #[test]
    fn header_row_at_last_column() {
        let sheet = grid(&[&[text("ID"), text("Name")]]);
        let result = find_header_row(&sheet, u32::MAX, 1, &["ID", "Name"]);
        assert!(matches!(
            result.as_ref().map_err(ExtractError::as_scan_error),
            Err(Some(ScanError::ScanFailure { .. }))
        ));
    }

    #[test]
    fn cell_value_row_major() -> Result<(), ExtractError> {
        let sheet = grid(&[
            &[None, text("Occupancy*")],
            &[text("Occupancy*"), None],
        ]);
        let target = Scalar::from("Occupancy*");
        assert_eq!(find_value(&sheet, &Rectangle::open(1, 1, None, None), &target)?, (2, 1));
        assert_eq!(find_value(&sheet, &Rectangle::open(1, 1, Some(1), None), &target)?, (1, 2));

        let result = find_value(&sheet, &Rectangle::open(1, 3, Some(1), None), &target);
        match result.as_ref().map_err(ExtractError::as_scan_error) {
            Err(Some(ScanError::ScanFailure { what, rect })) => {
                assert!(what.contains("Occupancy*"));
                assert_eq!(rect.min_row, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn empty_text_is_not_empty_cell() -> Result<(), ExtractError> {
        let sheet = grid(&[&[text(""), None, text("x")]]);
        assert_eq!(find_value(&sheet, &Rectangle::open(1, 1, None, None), &Scalar::Empty)?, (2, 1));
        Ok(())
    }

    #[test]
    fn labels_checked() -> Result<(), ExtractError> {
        let sheet = grid(&[&[text("Energy Source"), text("ID"), None, text("Type")]]);
        let expected = [Some("Energy Source"), Some("ID"), None, Some("Type")];
        let found = expect_labels(&sheet, &Rectangle::parse("A1:D1")?, &expected, "energy sources")?;
        assert_eq!(found.len(), 4);

        let expected = [Some("Energy Source"), Some("ID"), Some(""), Some("Type")];
        let result = expect_labels(&sheet, &Rectangle::parse("A1:D1")?, &expected, "energy sources");
        assert!(matches!(
            result.as_ref().map_err(ExtractError::as_scan_error),
            Err(Some(ScanError::LabelMismatch { .. }))
        ));
        Ok(())
    }

    #[test]
    fn run_length() {
        let sheet = grid(&[&[text("a"), text("b"), None, text("d")], &[text("a"), text("b")]]);
        assert_eq!(row_run_length(&sheet, 1, 1, Strictness::Lenient), 2);
        assert_eq!(row_run_length(&sheet, 4, 1, Strictness::Lenient), 1);
        assert_eq!(row_run_length(&sheet, 1, 2, Strictness::Lenient), 2);
        assert_eq!(row_run_length(&sheet, 3, 1, Strictness::Lenient), 0);

        let mut sheet = Sheet::new("Wide");
        sheet.set(u32::MAX - 1, 1, "a");
        sheet.set(u32::MAX, 1, "b");
        assert_eq!(row_run_length(&sheet, u32::MAX - 1, 1, Strictness::Lenient), 2);
    }
}
