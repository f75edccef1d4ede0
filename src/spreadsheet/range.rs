use crate::error::ExtractError;
use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::index_to_col;
use crate::spreadsheet::reference::row_to_index;
use regex::Regex;
use std::fmt::Display;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors related to range and rectangle parsing.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String),

    #[error("Expected 4 bounds for a cell range, got {0}")]
    BoundsError(usize),

    #[error("Range '{0}' is neither a single row nor a single column")]
    SingleLineError(String),
}

/// A canonical cell rectangle with 1-based inclusive bounds.
///
/// The minimum corner is always closed. A maximum bound of `None` is open and
/// extends to the data extent of the sheet being scanned. Closed pairs always
/// satisfy `min <= max`, whatever order the corners were supplied in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub min_col: u32,
    pub min_row: u32,
    pub max_col: Option<u32>,
    pub max_row: Option<u32>,
}

impl Rectangle {
    /// Creates a closed rectangle from two corners given in any order.
    pub fn new(col_a: u32, row_a: u32, col_b: u32, row_b: u32) -> Self {
        Self::normalize(col_a, row_a, Some(col_b), Some(row_b))
    }

    /// Creates a rectangle whose maximum bounds may be open.
    pub fn open(min_col: u32, min_row: u32, max_col: Option<u32>, max_row: Option<u32>) -> Self {
        Self::normalize(min_col, min_row, max_col, max_row)
    }

    /// Builds a rectangle from a `[mincol, minrow, maxcol, maxrow]` descriptor.
    ///
    /// A missing or zero minimum means the first column/row; a missing or zero
    /// maximum is open.
    pub fn from_bounds(bounds: &[Option<u32>]) -> Result<Self, ExtractError> {
        match bounds {
            [min_col, min_row, max_col, max_row] => Ok(Self::normalize(
                min_col.unwrap_or(1),
                min_row.unwrap_or(1),
                max_col.filter(|col| *col > 0),
                max_row.filter(|row| *row > 0),
            )),
            _ => Err(RangeError::BoundsError(bounds.len()))?,
        }
    }

    /// Parses an A1-style range ("A3:B13", "$A$3:$B$13", "B9:A1", "A", "3:5", "A5:C").
    pub fn parse(value: &str) -> Result<Self, ExtractError> {
        Self::try_from(value)
    }

    fn normalize(min_col: u32, min_row: u32, max_col: Option<u32>, max_row: Option<u32>) -> Self {
        let (min_col, max_col) = order(min_col.max(1), max_col);
        let (min_row, max_row) = order(min_row.max(1), max_row);
        Rectangle {
            min_col,
            min_row,
            max_col,
            max_row,
        }
    }

    /// Upper column bound, with an open bound closed at `extent`.
    pub fn max_col_or(&self, extent: u32) -> u32 {
        self.max_col.unwrap_or(extent)
    }

    /// Upper row bound, with an open bound closed at `extent`.
    pub fn max_row_or(&self, extent: u32) -> u32 {
        self.max_row.unwrap_or(extent)
    }

    /// True when the rectangle is exactly one column wide.
    pub fn is_single_col(&self) -> bool {
        self.max_col == Some(self.min_col)
    }

    /// True when the rectangle is exactly one row high.
    pub fn is_single_row(&self) -> bool {
        self.max_row == Some(self.min_row)
    }
}

fn order(min: u32, max: Option<u32>) -> (u32, Option<u32>) {
    match max {
        Some(max) if max < min => (max.max(1), Some(min)),
        _ => (min, max),
    }
}

fn range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$?([A-Z]*)\$?(\d*)(?::\$?([A-Z]*)\$?(\d*))?$").expect("Hardcode regex pattern")
    })
}

impl TryFrom<&str> for Rectangle {
    type Error = ExtractError;

    /// Parses an A1-style range. Single cells, whole columns ("A:C") and whole
    /// rows ("3:5") are accepted; a corner with neither letters nor digits is not.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let upper = value.trim().to_ascii_uppercase();
        let error = || RangeError::FormatError(value.to_owned());
        let captures = range_pattern().captures(&upper).ok_or_else(error)?;
        let text = |index: usize| captures.get(index).map(|matcher| matcher.as_str()).unwrap_or("");
        let (col_a, row_a) = (text(1), text(2));
        let has_second = captures.get(3).is_some() || captures.get(4).is_some() || upper.contains(':');
        let (col_b, row_b) = if has_second { (text(3), text(4)) } else { (col_a, row_a) };

        if (col_a.is_empty() && row_a.is_empty()) || (col_b.is_empty() && row_b.is_empty()) {
            Err(error())?
        }
        // Whole columns and whole rows must be paired with the same kind of corner
        if (row_a.is_empty() && !row_b.is_empty()) || (col_a.is_empty() && !col_b.is_empty()) {
            Err(error())?
        }
        if !col_a.is_empty() && col_b.is_empty() {
            Err(error())?
        }

        let parse_col = |letters: &str| -> Result<Option<u32>, RangeError> {
            if letters.is_empty() {
                Ok(None)
            } else {
                col_to_index(letters).map(Some).ok_or_else(error)
            }
        };
        let parse_row = |digits: &str| -> Result<Option<u32>, RangeError> {
            if digits.is_empty() {
                Ok(None)
            } else {
                row_to_index(digits).map(Some).ok_or_else(error)
            }
        };

        Ok(Self::normalize(
            parse_col(col_a)?.unwrap_or(1),
            parse_row(row_a)?.unwrap_or(1),
            parse_col(col_b)?,
            parse_row(row_b)?,
        ))
    }
}

impl TryFrom<&[Option<u32>]> for Rectangle {
    type Error = ExtractError;

    fn try_from(bounds: &[Option<u32>]) -> Result<Self, Self::Error> {
        Self::from_bounds(bounds)
    }
}

impl From<[u32; 4]> for Rectangle {
    fn from([col_a, row_a, col_b, row_b]: [u32; 4]) -> Self {
        Self::new(col_a, row_a, col_b, row_b)
    }
}

impl Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            index_to_col(self.min_col),
            self.min_row,
            self.max_col.map(index_to_col).unwrap_or_default(),
            self.max_row.map(|row| row.to_string()).unwrap_or_default()
        )
    }
}
