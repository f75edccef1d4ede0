//! # Spreadsheet Grid Access
//!
//! Loads an XLSX workbook into in-memory [`Sheet`] grids: typed cell values,
//! per-cell fill markers and, for the selected sheets, the recovered form
//! controls and textbox captions. Everything is read in one pass when the
//! workbook is opened; the result is read-only afterwards.

pub mod cell;
pub mod options;
pub mod range;
pub(crate) mod reference;
pub mod scalar;
pub mod sheet;
pub(crate) mod styles;
pub(crate) mod xlsx;

use crate::error::ExtractError;
use crate::error::ResultMessage;
use crate::package::controls;
use crate::package::Package;
use crate::spreadsheet::options::LoadOptions;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::styles::Styles;
use indexmap::IndexMap;
use log::debug;
use log::warn;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use thiserror::Error;

/// Default location of the workbook part when the root relationships do not name one
const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";
const DEFAULT_SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const DEFAULT_STYLES_PART: &str = "xl/styles.xml";

const REL_WORKSHEET: &str = "/worksheet";
const REL_SHARED_STRINGS: &str = "/sharedStrings";
const REL_STYLES: &str = "/styles";

/// Errors raised while loading a workbook.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Part '{0}' not found in package")]
    PartNotFound(String),

    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("Invalid cell value '{value}' at '{sheet}'!{reference}")]
    CellValueError {
        sheet: String,
        reference: String,
        value: String,
    },
}

/// A loaded workbook: its sheets in workbook order.
#[derive(Debug, Default)]
pub struct Workbook {
    sheets: IndexMap<String, Sheet>,
    is_1904: bool,
}

impl Workbook {
    /// Opens and loads a workbook file.
    pub fn open<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, ExtractError> {
        let display = path.as_ref().display().to_string();
        let mut package = Package::open(path).with_prefix(&display)?;
        Self::load(&mut package, options).with_prefix(&display)
    }

    /// Loads a workbook from any seekable reader holding an XLSX package.
    pub fn from_reader<R: Read + Seek>(reader: R, options: &LoadOptions) -> Result<Self, ExtractError> {
        let mut package = Package::new(reader)?;
        Self::load(&mut package, options)
    }

    /// Loads every sheet of an opened package.
    pub fn load<R: Read + Seek>(package: &mut Package<R>, options: &LoadOptions) -> Result<Self, ExtractError> {
        let workbook_part = package
            .main_part()?
            .unwrap_or_else(|| DEFAULT_WORKBOOK_PART.to_owned());
        let (declared, is_1904) = {
            let mut reader = package.require_xml_reader(&workbook_part)?;
            xlsx::read_workbook(&mut reader)?
        };
        let relationships = package.relationships(&workbook_part)?;

        let part_of = |suffix: &str, fallback: &str| {
            relationships
                .by_type(suffix)
                .next()
                .map(|relationship| relationship.target.to_owned())
                .unwrap_or_else(|| fallback.to_owned())
        };
        let shared_strings_part = part_of(REL_SHARED_STRINGS, DEFAULT_SHARED_STRINGS_PART);
        let styles_part = part_of(REL_STYLES, DEFAULT_STYLES_PART);

        let shared_strings = match package.xml_reader(&shared_strings_part)? {
            Some(mut reader) => xlsx::read_shared_strings(&mut reader)?,
            None => Vec::new(),
        };
        let styles = match package.xml_reader(&styles_part)? {
            Some(mut reader) => Styles::parse(&mut reader, is_1904)?,
            None => Styles::default(),
        };
        debug!(
            "Workbook '{workbook_part}': {} sheets, {} shared strings, 1904 dates: {is_1904}",
            declared.len(),
            shared_strings.len()
        );

        let mut sheets = IndexMap::new();
        for (name, id) in declared {
            let part = match relationships.get(&id) {
                Some(relationship) if relationship.kind.ends_with(REL_WORKSHEET) => relationship.target.to_owned(),
                Some(relationship) => {
                    debug!("Skipping sheet '{name}' of type '{}'", relationship.kind);
                    continue;
                }
                None => {
                    warn!("Sheet '{name}' refers to unknown relationship '{id}'");
                    continue;
                }
            };
            let mut sheet = {
                let mut reader = package.require_xml_reader(&part)?;
                xlsx::read_sheet(&mut reader, &name, &shared_strings, &styles, options.data_only)?
            };
            if options.accept(&name) {
                sheet.attach_controls(controls::recover(package, &part)?);
            }
            sheets.insert(name, sheet);
        }

        Ok(Workbook { sheets, is_1904 })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    pub fn sheet(&self, name: &str) -> Result<&Sheet, ExtractError> {
        match self.sheets.get(name) {
            Some(sheet) => Ok(sheet),
            None => Err(SpreadsheetError::SheetNotFound(name.to_owned()))?,
        }
    }

    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.values()
    }

    /// Whether serial dates count from 1904 instead of 1900.
    pub fn is_1904(&self) -> bool {
        self.is_1904
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::FillMarker;
    use crate::spreadsheet::scalar::Scalar;
    use crate::test_support::PackageBuilder;
    use chrono::NaiveDate;

    const STYLES: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy\-mm\-dd"/></numFmts>
<fills count="3">
<fill><patternFill patternType="none"/></fill>
<fill><patternFill patternType="gray125"/></fill>
<fill><patternFill patternType="solid"><fgColor theme="8" tint="0.79998168889431442"/><bgColor indexed="64"/></patternFill></fill>
</fills>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="3">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
<xf numFmtId="0" fontId="0" fillId="2" borderId="0" xfId="0" applyFill="1"/>
<xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
</cellXfs>
</styleSheet>"#;

    const SHARED_STRINGS: &str = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
<si><t>Building Name</t></si>
<si><r><t>Year </t></r><r><rPr><b/></rPr><t>Built</t></r><rPh sb="0" eb="1"><t>ignored</t></rPh></si>
<si><t xml:space="preserve">Area </t></si>
</sst>"#;

    fn builder() -> PackageBuilder {
        let sheet = PackageBuilder::worksheet(
            r#"<sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" s="1" t="inlineStr"><is><t>Head Office</t></is></c></row>
<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2" s="1"><v>1987</v></c><c r="C2" s="2"><v>43466</v></c></row>
<row r="3"><c r="A3" t="s"><v>2</v></c><c r="B3" s="1"/><c r="C3" t="str"><f>IF(Instructions!$B$18="IP","sq ft","sq m")</f><v>sq ft</v></c></row>
<row r="4"><c r="A4" t="b"><v>1</v></c><c r="B4" t="e"><v>#DIV/0!</v></c><c r="C4"><f t="shared" ref="C4:C5" si="0">B2*2</f><v>3974</v></c></row>
<row r="5"><c r="C5"><f t="shared" si="0"/><v>12</v></c></row>
</sheetData>"#,
        );
        PackageBuilder::workbook(&["All - Building", "Notes"])
            .part("xl/worksheets/sheet1.xml", &sheet)
            .part("xl/styles.xml", STYLES)
            .part("xl/sharedStrings.xml", SHARED_STRINGS)
    }

    #[test]
    fn loads_values_and_fills() -> Result<(), ExtractError> {
        let workbook = builder().into_workbook(&LoadOptions::default())?;
        assert_eq!(workbook.sheet_names(), vec!["All - Building", "Notes"]);
        assert!(!workbook.is_1904());

        let sheet = workbook.sheet("All - Building")?;
        assert_eq!(sheet.name(), "All - Building");
        assert_eq!(sheet.value(1, 1), &Scalar::from("Building Name"));
        assert_eq!(sheet.value(2, 1), &Scalar::from("Head Office"));
        assert_eq!(sheet.value(1, 2), &Scalar::from("Year Built"));
        assert_eq!(sheet.value(1, 3), &Scalar::from("Area "));
        assert_eq!(sheet.value(2, 2), &Scalar::Number(1987.0));
        let date = NaiveDate::from_ymd_opt(2019, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(sheet.value(3, 2), &Scalar::from(date));
        assert_eq!(sheet.value(1, 4), &Scalar::Boolean(true));
        assert_eq!(sheet.value(2, 4), &Scalar::from("#DIV/0!"));

        assert_eq!(sheet.fill(2, 1), &FillMarker::Theme(8));
        assert_eq!(sheet.fill(2, 3), &FillMarker::Theme(8));
        assert_eq!(sheet.value(2, 3), &Scalar::Empty);
        assert_eq!(sheet.fill(1, 1), &FillMarker::None);
        assert_eq!(sheet.fill(9, 9), &FillMarker::None);
        assert_eq!((sheet.max_col(), sheet.max_row()), (3, 5));
        Ok(())
    }

    #[test]
    fn formulas_follow_data_only() -> Result<(), ExtractError> {
        let workbook = builder().into_workbook(&LoadOptions::default())?;
        let sheet = workbook.sheet("All - Building")?;
        assert_eq!(sheet.value(3, 3), &Scalar::from(r#"=IF(Instructions!$B$18="IP","sq ft","sq m")"#));
        assert_eq!(sheet.value(3, 4), &Scalar::from("=B2*2"));
        assert_eq!(sheet.value(3, 5), &Scalar::Number(12.0));

        let options = LoadOptions {
            data_only: true,
            ..LoadOptions::default()
        };
        let workbook = builder().into_workbook(&options)?;
        let sheet = workbook.sheet("All - Building")?;
        assert_eq!(sheet.value(3, 3), &Scalar::from("sq ft"));
        assert_eq!(sheet.value(3, 4), &Scalar::Number(3974.0));
        Ok(())
    }

    #[test]
    fn unknown_sheet() -> Result<(), ExtractError> {
        let workbook = builder().into_workbook(&LoadOptions::default())?;
        assert!(matches!(
            workbook.sheet("Missing"),
            Err(ExtractError::SpreadsheetError(SpreadsheetError::SheetNotFound(_)))
        ));
        Ok(())
    }

    #[test]
    fn bad_number_reports_cell() -> Result<(), ExtractError> {
        let sheet = PackageBuilder::worksheet(r#"<sheetData><row r="1"><c r="B1"><v>abc</v></c></row></sheetData>"#);
        let result = PackageBuilder::workbook(&["Broken"])
            .part("xl/worksheets/sheet1.xml", &sheet)
            .into_workbook(&LoadOptions::default());
        match result {
            Err(ExtractError::SpreadsheetError(SpreadsheetError::CellValueError { sheet, reference, value })) => {
                assert_eq!((sheet.as_str(), reference.as_str(), value.as_str()), ("Broken", "B1", "abc"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn controls_only_for_accepted_sheets() -> Result<(), ExtractError> {
        let sheet = PackageBuilder::worksheet(
            r#"<sheetData/><drawing r:id="rId1"/><controls><control shapeId="1025" r:id="rId2" name="Check Box 1"/></controls>"#,
        );
        let builder = PackageBuilder::workbook(&["L2 - Envelope", "Other"])
            .part("xl/worksheets/sheet1.xml", &sheet)
            .part("xl/worksheets/sheet2.xml", &sheet)
            .part(
                "xl/worksheets/_rels/sheet1.xml.rels",
                &PackageBuilder::relationships(&[("rId2", "ctrlProp", "../ctrlProps/ctrlProp1.xml")]),
            )
            .part(
                "xl/worksheets/_rels/sheet2.xml.rels",
                &PackageBuilder::relationships(&[("rId2", "ctrlProp", "../ctrlProps/ctrlProp1.xml")]),
            )
            .part("xl/ctrlProps/ctrlProp1.xml", r#"<formControlPr objectType="CheckBox" checked="Checked"/>"#);

        let options = LoadOptions::default().with_control_sheets(&["L2 - *"])?;
        let workbook = builder.into_workbook(&options)?;
        assert!(workbook.sheet("L2 - Envelope")?.control("Check Box 1").is_some());
        assert!(workbook.sheet("Other")?.controls().is_empty());
        Ok(())
    }
}
