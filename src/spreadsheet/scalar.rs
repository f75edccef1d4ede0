use chrono::NaiveDateTime;
use std::fmt::Display;
use std::hash::Hash;
use std::hash::Hasher;

/// How strictly a cell is judged to hold "no data".
///
/// Several scans test cells for data with a loose truthiness check that also
/// treats `0`, `false` and the empty string as missing. `Lenient` keeps that
/// behaviour; `Strict` only treats truly empty cells as missing, so legitimate
/// zero-valued records survive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

/// A single cell value.
#[derive(Clone, Debug, Default)]
pub enum Scalar {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    /// Date, time or date-time; callers stringify before handing to non-temporal consumers
    Date(NaiveDateTime),
}

impl Scalar {
    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Empty)
    }

    /// True when the value counts as "no data" under the given strictness.
    pub fn is_blank(&self, strictness: Strictness) -> bool {
        match (self, strictness) {
            (Scalar::Empty, _) => true,
            (_, Strictness::Strict) => false,
            (Scalar::Text(text), Strictness::Lenient) => text.is_empty(),
            (Scalar::Number(number), Strictness::Lenient) => *number == 0.0,
            (Scalar::Boolean(value), Strictness::Lenient) => !*value,
            (Scalar::Date(_), Strictness::Lenient) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns a copy with a date replaced by its text form; other kinds are unchanged.
    pub fn date_to_text(&self) -> Scalar {
        match self {
            Scalar::Date(_) => Scalar::Text(self.to_string()),
            other => other.clone(),
        }
    }

    /// Compares against an optional expected label; `None` only matches an empty cell.
    pub fn matches_label(&self, label: Option<&str>) -> bool {
        match (self, label) {
            (Scalar::Empty, None) => true,
            (Scalar::Text(text), Some(label)) => text == label,
            _ => false,
        }
    }
}

/// Maps -0.0 onto 0.0 and every NaN onto one bit pattern.
fn number_bits(number: f64) -> u64 {
    if number == 0.0 {
        0.0f64.to_bits()
    } else if number.is_nan() {
        f64::NAN.to_bits()
    } else {
        number.to_bits()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Empty, Scalar::Empty) => true,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Number(a), Scalar::Number(b)) => number_bits(*a) == number_bits(*b),
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a == b,
            (Scalar::Date(a), Scalar::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Empty => (),
            Scalar::Text(text) => text.hash(state),
            Scalar::Number(number) => number_bits(*number).hash(state),
            Scalar::Boolean(value) => value.hash(state),
            Scalar::Date(date) => date.hash(state),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Empty => Ok(()),
            Scalar::Text(text) => write!(f, "{text}"),
            Scalar::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
                write!(f, "{}", *number as i64)
            }
            Scalar::Number(number) => write!(f, "{number}"),
            Scalar::Boolean(value) => write!(f, "{value}"),
            Scalar::Date(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        Scalar::Date(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Scalar::Empty)
    }
}
