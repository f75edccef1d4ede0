use crate::error::ExtractError;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::scalar::Scalar;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Opaque per-cell fill marker, taken from the foreground colour of the cell's pattern fill.
///
/// Only ever compared for equality against an expected sentinel; the colour is
/// never interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillMarker {
    /// No pattern fill colour
    #[default]
    None,
    /// Automatic (system) colour
    Auto,
    /// Legacy palette index
    Indexed(u32),
    /// Theme colour slot
    Theme(u32),
    /// Explicit ARGB value, upper case
    Rgb(String),
}

/// Types of raw cell data in worksheet parts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (1/0)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string and formula string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values such as `#DIV/0!`
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "14" | "15" | "16" | "17" | "18" | "19" | "20" | "21" | "22" | "45" | "46" | "47" => {
                Some(Self::date_time(is_1904))
            }
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Analyzes format codes for date/time patterns outside literals and brackets.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_temporal = false;
        let mut is_color = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' if !is_escaped => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_literal && !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_color && !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' | 'H' | 'h' | 'S' | 's' => is_temporal = true,
                _ => (),
            }
        }

        if is_temporal {
            Self::date_time(is_1904)
        } else {
            Self::Number
        }
    }

    fn date_time(is_1904: bool) -> Self {
        if is_1904 {
            Self::NumberDateTime1904
        } else {
            Self::NumberDateTime1900
        }
    }

    /// Converts a raw cell value into a scalar.
    ///
    /// Shared strings must already be resolved by the caller, so `SharedString`
    /// is treated as text here.
    pub(crate) fn to_scalar(&self, raw: &str) -> Result<Scalar, ExtractError> {
        let scalar = match self {
            CellType::Empty => Scalar::Empty,
            CellType::Boolean => Scalar::Boolean(raw.trim() == "1" || raw.trim().eq_ignore_ascii_case("true")),
            CellType::Number => Scalar::Number(raw.trim().parse::<f64>()?),
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                let serial = raw.trim().parse::<f64>()?;
                match serial_to_datetime(serial, *self == CellType::NumberDateTime1904) {
                    Some(datetime) => Scalar::Date(datetime),
                    None => Scalar::Number(serial),
                }
            }
            CellType::IsoDateTime => match parse_iso_datetime(raw) {
                Some(datetime) => Scalar::Date(datetime),
                None => Scalar::Text(raw.to_owned()),
            },
            CellType::InlineString | CellType::SharedString | CellType::Error => Scalar::Text(raw.to_owned()),
        };
        Ok(scalar)
    }
}

/// Converts an Excel serial day number into a date-time.
/// Handles the Lotus 1-2-3 leap year bug for the 1900 epoch.
pub(crate) fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.trunc() as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let milliseconds = (serial.fract() * 86_400_000f64).round() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(Duration::days(days + offset) + Duration::milliseconds(milliseconds))
}

/// Parses ISO 8601 date or date-time text stored in `t="d"` cells.
fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    if value.contains('T') {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }
}

/// A single stored cell: 1-based position, typed value and fill marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Column index (1-based)
    pub col: u32,
    /// Row index (1-based)
    pub row: u32,
    pub value: Scalar,
    pub fill: FillMarker,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub fn reference(&self) -> String {
        index_to_reference(self.col, self.row)
    }
}
