use crate::error::ExtractError;
use crate::package::controls::Control;
use crate::package::controls::SheetControls;
use crate::scan::ScanError;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::FillMarker;
use crate::spreadsheet::scalar::Scalar;
use indexmap::IndexMap;
use std::collections::HashMap;

static EMPTY_VALUE: Scalar = Scalar::Empty;
static EMPTY_FILL: FillMarker = FillMarker::None;

/// A worksheet grid addressable by 1-based (column, row), plus the controls and
/// textbox captions recovered from its drawing layer.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    name: String,
    cells: HashMap<(u32, u32), Cell>,
    max_col: u32,
    max_row: u32,
    controls: SheetControls,
}

impl Sheet {
    /// Creates an empty sheet.
    pub fn new(name: &str) -> Self {
        Sheet {
            name: name.to_owned(),
            ..Sheet::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a cell, replacing any previous cell at the same position.
    pub fn push(&mut self, cell: Cell) {
        self.max_col = self.max_col.max(cell.col);
        self.max_row = self.max_row.max(cell.row);
        self.cells.insert((cell.col, cell.row), cell);
    }

    /// Sets the value of a cell, keeping its fill marker.
    pub fn set<V: Into<Scalar>>(&mut self, col: u32, row: u32, value: V) {
        let fill = self.fill(col, row).clone();
        self.push(Cell {
            col,
            row,
            value: value.into(),
            fill,
        });
    }

    /// Sets the fill marker of a cell, keeping its value.
    pub fn set_fill(&mut self, col: u32, row: u32, fill: FillMarker) {
        let value = self.value(col, row).clone();
        self.push(Cell { col, row, value, fill });
    }

    pub fn cell(&self, col: u32, row: u32) -> Option<&Cell> {
        self.cells.get(&(col, row))
    }

    /// Value at (col, row); [`Scalar::Empty`] outside the stored cells.
    pub fn value(&self, col: u32, row: u32) -> &Scalar {
        self.cell(col, row).map(|cell| &cell.value).unwrap_or(&EMPTY_VALUE)
    }

    /// Fill marker at (col, row); [`FillMarker::None`] outside the stored cells.
    pub fn fill(&self, col: u32, row: u32) -> &FillMarker {
        self.cell(col, row).map(|cell| &cell.fill).unwrap_or(&EMPTY_FILL)
    }

    /// Largest column holding a stored cell, 0 for an empty sheet.
    pub fn max_col(&self) -> u32 {
        self.max_col
    }

    /// Largest row holding a stored cell, 0 for an empty sheet.
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Replaces the recovered controls and textbox captions.
    pub fn attach_controls(&mut self, controls: SheetControls) {
        self.controls = controls;
    }

    pub fn controls(&self) -> &IndexMap<String, Control> {
        &self.controls.controls
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.controls.get(name)
    }

    pub fn textboxes(&self) -> &IndexMap<String, String> {
        &self.controls.textboxes
    }

    pub fn textbox(&self, name: &str) -> Option<&str> {
        self.controls.textboxes.get(name).map(String::as_str)
    }

    /// Captions of the checked controls among `names`, in the given order.
    ///
    /// A control without a caption contributes an empty string. Every name must
    /// refer to a recovered control.
    pub fn checked_captions(&self, names: &[&str]) -> Result<Vec<String>, ExtractError> {
        let mut captions = Vec::new();
        for name in names {
            let control = self.require_control(name)?;
            if control.checked {
                captions.push(control.text.to_owned().unwrap_or_default());
            }
        }
        Ok(captions)
    }

    /// Looks up a control that must exist.
    pub fn require_control(&self, name: &str) -> Result<&Control, ExtractError> {
        match self.control(name) {
            Some(control) => Ok(control),
            None => Err(ScanError::MissingRequired(format!("control '{name}' on sheet '{}'", self.name)))?,
        }
    }
}
