//! Flat list scans over a single row or column.

use crate::error::ExtractError;
use crate::scan::VALUE_FILL;
use crate::spreadsheet::cell::FillMarker;
use crate::spreadsheet::range::RangeError;
use crate::spreadsheet::range::Rectangle;
use crate::spreadsheet::scalar::Scalar;
use crate::spreadsheet::scalar::Strictness;
use crate::spreadsheet::sheet::Sheet;

/// Options of [`list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListOptions {
    /// Stop at the first blank cell or the first cell with an unexpected fill
    pub variable_length: bool,
    pub fill: FillMarker,
    pub strictness: Strictness,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            variable_length: false,
            fill: VALUE_FILL,
            strictness: Strictness::default(),
        }
    }
}

/// Coordinates of a one-column or one-row rectangle; a single cell counts as a column.
fn line_cells(sheet: &Sheet, rect: &Rectangle) -> Result<Vec<(u32, u32)>, ExtractError> {
    if rect.is_single_col() {
        let col = rect.min_col;
        Ok((rect.min_row..=rect.max_row_or(sheet.max_row())).map(|row| (col, row)).collect())
    } else if rect.is_single_row() {
        let row = rect.min_row;
        Ok((rect.min_col..=rect.max_col_or(sheet.max_col())).map(|col| (col, row)).collect())
    } else {
        Err(RangeError::SingleLineError(rect.to_string()))?
    }
}

/// Reads a single row or column as a list.
///
/// In variable length mode the list ends before the first blank cell or the
/// first cell whose fill differs from `options.fill`.
pub fn list(sheet: &Sheet, rect: &Rectangle, options: &ListOptions) -> Result<Vec<Scalar>, ExtractError> {
    let mut result = Vec::new();
    for (col, row) in line_cells(sheet, rect)? {
        let value = sheet.value(col, row);
        if options.variable_length && (value.is_blank(options.strictness) || sheet.fill(col, row) != &options.fill) {
            break;
        }
        result.push(value.clone());
    }
    Ok(result)
}

/// Reads every value of a single row or column, empty cells included.
pub fn line(sheet: &Sheet, rect: &Rectangle) -> Result<Vec<Scalar>, ExtractError> {
    let cells = line_cells(sheet, rect)?;
    Ok(cells.into_iter().map(|(col, row)| sheet.value(col, row).clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::tests::grid;
    use crate::scan::tests::number;
    use crate::scan::tests::text;

    fn filled_column(values: &[Option<Scalar>], filled: usize) -> Sheet {
        let rows: Vec<[Option<Scalar>; 1]> = values.iter().map(|value| [value.clone()]).collect();
        let rows: Vec<&[Option<Scalar>]> = rows.iter().map(|row| &row[..]).collect();
        let mut sheet = grid(&rows);
        for row in 1..=filled as u32 {
            sheet.set_fill(1, row, VALUE_FILL);
        }
        sheet
    }

    #[test]
    fn variable_length_column() -> Result<(), ExtractError> {
        let sheet = filled_column(&[number(5.0), number(7.0), None, number(9.0)], 2);
        let options = ListOptions {
            variable_length: true,
            ..ListOptions::default()
        };
        let values = list(&sheet, &Rectangle::parse("A1:A4")?, &options)?;
        assert_eq!(values, vec![Scalar::Number(5.0), Scalar::Number(7.0)]);
        Ok(())
    }

    #[test]
    fn variable_length_stops_at_fill() -> Result<(), ExtractError> {
        let sheet = filled_column(&[text("Attic"), text("Garage"), text("Basement")], 2);
        let options = ListOptions {
            variable_length: true,
            ..ListOptions::default()
        };
        let values = list(&sheet, &Rectangle::parse("A1:A3")?, &options)?;
        assert_eq!(values, vec![Scalar::from("Attic"), Scalar::from("Garage")]);
        Ok(())
    }

    #[test]
    fn strictness_keeps_zero() -> Result<(), ExtractError> {
        let sheet = filled_column(&[number(5.0), number(0.0), number(9.0)], 3);
        let lenient = ListOptions {
            variable_length: true,
            ..ListOptions::default()
        };
        assert_eq!(list(&sheet, &Rectangle::parse("A1:A3")?, &lenient)?.len(), 1);

        let strict = ListOptions {
            strictness: Strictness::Strict,
            ..lenient
        };
        assert_eq!(list(&sheet, &Rectangle::parse("A1:A3")?, &strict)?.len(), 3);
        Ok(())
    }

    #[test]
    fn fixed_length_row_keeps_empty_cells() -> Result<(), ExtractError> {
        let sheet = grid(&[&[text("a"), None, text("c")]]);
        let values = list(&sheet, &Rectangle::parse("A1:C1")?, &ListOptions::default())?;
        assert_eq!(values, vec![Scalar::from("a"), Scalar::Empty, Scalar::from("c")]);
        assert_eq!(line(&sheet, &Rectangle::parse("A1:D1")?)?.len(), 4);
        Ok(())
    }

    #[test]
    fn open_column_runs_to_extent() -> Result<(), ExtractError> {
        let sheet = grid(&[&[text("a")], &[text("b")], &[text("c")]]);
        let values = line(&sheet, &Rectangle::open(1, 2, Some(1), None))?;
        assert_eq!(values, vec![Scalar::from("b"), Scalar::from("c")]);
        Ok(())
    }

    #[test]
    fn multi_line_rectangle_is_rejected() {
        let sheet = grid(&[&[text("a"), text("b")]]);
        let result = list(&sheet, &Rectangle::new(1, 1, 2, 2), &ListOptions::default());
        assert!(matches!(result, Err(ExtractError::RangeError(RangeError::SingleLineError(_)))));
    }
}
