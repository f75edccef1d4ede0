//! # Sheet Extract
//!
//! Reads structured records out of fixed-layout spreadsheet templates stored as
//! Office Open XML workbooks (`.xlsx`, `.xlsm`).
//!
//! ## Layers
//!
//! - **Package**: ZIP container access, relationship resolution and recovery of
//!   form control captions and checkbox states from the drawing layer
//! - **Spreadsheet**: cell grids with values and fill markers, addressed by
//!   1-based (column, row)
//! - **Scan**: region scanners for label/value pairs, lists, keyed tables and
//!   anchored searches
//! - **Template**: sheet readers that assemble scanner output into nested
//!   [`Record`]s, such as the ASHRAE Standard 211 audit workbook
//!
//! ## Example
//!
//! ```no_run
//! use sheet_extract::scan::UnitSystem;
//! use sheet_extract::template::read_std211;
//! use sheet_extract::LoadOptions;
//! use sheet_extract::Workbook;
//!
//! # fn main() -> Result<(), sheet_extract::ExtractError> {
//! let workbook = Workbook::open("audit.xlsx", &LoadOptions::default())?;
//! let record = read_std211(&workbook, UnitSystem::Ip)?;
//! println!("{record:?}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod package;
pub mod record;
pub mod scan;
pub mod spreadsheet;
pub mod template;

mod helpers;
#[cfg(test)]
mod test_support;

pub use crate::error::ExtractError;
pub use crate::record::Record;
pub use crate::spreadsheet::cell::FillMarker;
pub use crate::spreadsheet::options::LoadOptions;
pub use crate::spreadsheet::range::Rectangle;
pub use crate::spreadsheet::scalar::Scalar;
pub use crate::spreadsheet::sheet::Sheet;
pub use crate::spreadsheet::Workbook;
