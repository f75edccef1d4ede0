//! Nested records assembled from scanner output and handed to mapping consumers.

use crate::scan::KeyedTable;
use crate::spreadsheet::scalar::Scalar;
use indexmap::IndexMap;

/// One extracted record, shaped by the scan that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    /// A single cell value
    Value(Scalar),
    /// Flat list of values
    List(Vec<Scalar>),
    /// Labeled pairs
    Pairs(IndexMap<String, Scalar>),
    /// Records keyed by their first cell
    Keyed(KeyedTable),
    /// Labeled records in sheet order
    Rows(Vec<IndexMap<String, Scalar>>),
    /// Raw grid of values
    Grid(Vec<Vec<Scalar>>),
    /// Captions of the selected options of a checkbox group
    Choices(Vec<String>),
    /// Named sub-records
    Group(IndexMap<String, Record>),
}

impl Record {
    /// Member of a group record.
    pub fn get(&self, key: &str) -> Option<&Record> {
        match self {
            Record::Group(members) => members.get(key),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Scalar> {
        match self {
            Record::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&IndexMap<String, Record>> {
        match self {
            Record::Group(members) => Some(members),
            _ => None,
        }
    }

    /// Replaces every date scalar, keys of keyed tables included, with its text form.
    pub fn scrub_dates(&mut self) {
        match self {
            Record::Value(value) => *value = value.date_to_text(),
            Record::List(values) => scrub_all(values.iter_mut()),
            Record::Pairs(pairs) => scrub_all(pairs.values_mut()),
            Record::Keyed(table) => {
                *table = std::mem::take(table)
                    .into_iter()
                    .map(|(key, mut record)| {
                        scrub_all(record.values_mut());
                        (key.date_to_text(), record)
                    })
                    .collect();
            }
            Record::Rows(rows) => rows.iter_mut().for_each(|row| scrub_all(row.values_mut())),
            Record::Grid(grid) => grid.iter_mut().for_each(|row| scrub_all(row.iter_mut())),
            Record::Choices(_) => (),
            Record::Group(members) => members.values_mut().for_each(Record::scrub_dates),
        }
    }
}

fn scrub_all<'a>(values: impl Iterator<Item = &'a mut Scalar>) {
    for value in values {
        *value = value.date_to_text();
    }
}

impl From<Scalar> for Record {
    fn from(value: Scalar) -> Self {
        Record::Value(value)
    }
}

impl From<Vec<Scalar>> for Record {
    fn from(values: Vec<Scalar>) -> Self {
        Record::List(values)
    }
}

impl From<IndexMap<String, Scalar>> for Record {
    fn from(pairs: IndexMap<String, Scalar>) -> Self {
        Record::Pairs(pairs)
    }
}

impl From<KeyedTable> for Record {
    fn from(table: KeyedTable) -> Self {
        Record::Keyed(table)
    }
}

impl From<Vec<IndexMap<String, Scalar>>> for Record {
    fn from(rows: Vec<IndexMap<String, Scalar>>) -> Self {
        Record::Rows(rows)
    }
}

impl From<Vec<Vec<Scalar>>> for Record {
    fn from(grid: Vec<Vec<Scalar>>) -> Self {
        Record::Grid(grid)
    }
}

impl From<Vec<String>> for Record {
    fn from(choices: Vec<String>) -> Self {
        Record::Choices(choices)
    }
}

impl From<IndexMap<String, Record>> for Record {
    fn from(members: IndexMap<String, Record>) -> Self {
        Record::Group(members)
    }
}
