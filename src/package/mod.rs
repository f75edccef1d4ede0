//! # Document Package Access
//!
//! Read-only access to the parts of an Office Open XML package: XML readers
//! for individual parts and a per-run cache of parsed relationship tables.
//! The package is treated as immutable for the lifetime of a [`Package`].

pub mod controls;
pub mod relationships;

use crate::error::ExtractError;
use crate::helpers::xml::XmlReader;
use crate::helpers::zip::ZipHelper;
use crate::package::relationships::relationships_part;
use crate::package::relationships::Relationships;
use crate::spreadsheet::SpreadsheetError;
use log::debug;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::rc::Rc;
use zip::read::ZipFile;
use zip::ZipArchive;

/// Relationship type suffix of the package's main document
const REL_OFFICE_DOCUMENT: &str = "/officeDocument";

/// An opened document package with cached relationship tables.
pub struct Package<R: Read + Seek> {
    zip: ZipArchive<R>,
    relationships: HashMap<String, Rc<Relationships>>,
}

impl Package<BufReader<File>> {
    /// Opens a package from a local file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> Package<R> {
    /// Wraps any seekable reader holding a ZIP archive.
    pub fn new(reader: R) -> Result<Self, ExtractError> {
        Ok(Package {
            zip: ZipArchive::new(reader)?,
            relationships: HashMap::new(),
        })
    }

    /// Checks whether a part exists.
    pub fn contains(&self, part: &str) -> bool {
        self.zip.contains(part)
    }

    /// Creates an XML reader for a part, or `None` when the part is missing.
    pub(crate) fn xml_reader(&'_ mut self, part: &str) -> Result<Option<XmlReader<BufReader<ZipFile<'_, R>>>>, ExtractError> {
        self.zip.xml_reader(part)
    }

    /// Creates an XML reader for a part that must exist.
    pub(crate) fn require_xml_reader(&'_ mut self, part: &str) -> Result<XmlReader<BufReader<ZipFile<'_, R>>>, ExtractError> {
        match self.zip.xml_reader(part)? {
            Some(reader) => Ok(reader),
            None => Err(SpreadsheetError::PartNotFound(part.to_owned()))?,
        }
    }

    /// Returns the relationship table of `part`, parsing and caching it on first use.
    ///
    /// A part without a relationships part has an empty table.
    pub fn relationships(&mut self, part: &str) -> Result<Rc<Relationships>, ExtractError> {
        if let Some(table) = self.relationships.get(part) {
            return Ok(Rc::clone(table));
        }
        let rels_part = relationships_part(part);
        let table = match self.zip.xml_reader(&rels_part)? {
            Some(mut reader) => Relationships::parse(&mut reader, part)?,
            None => {
                debug!("No relationships part '{rels_part}' for '{part}'");
                Relationships::empty(part)
            }
        };
        debug!("Loaded {} relationships for '{part}'", table.len());
        let table = Rc::new(table);
        self.relationships.insert(part.to_owned(), Rc::clone(&table));
        Ok(table)
    }

    /// Resolves a relationship id of `part` to a target part path.
    pub fn resolve(&mut self, part: &str, id: &str) -> Result<Option<String>, ExtractError> {
        Ok(self.relationships(part)?.target(id).map(str::to_owned))
    }

    /// Path of the main document part, found through the root relationships.
    pub fn main_part(&mut self) -> Result<Option<String>, ExtractError> {
        let root = self.relationships("")?;
        let main = root
            .by_type(REL_OFFICE_DOCUMENT)
            .find(|relationship| self.zip.contains(&relationship.target))
            .map(|relationship| relationship.target.to_owned());
        Ok(main)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::PackageBuilder;

    #[test]
    fn relationships_are_cached_and_resolved() -> Result<(), ExtractError> {
        let mut package = PackageBuilder::workbook(&["Sheet1"])
            .part(
                "xl/worksheets/_rels/sheet1.xml.rels",
                &PackageBuilder::relationships(&[("rId1", "drawing", "../drawings/drawing1.xml")]),
            )
            .into_package()?;

        let first = package.relationships("xl/worksheets/sheet1.xml")?;
        let second = package.relationships("xl/worksheets/sheet1.xml")?;
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(
            package.resolve("xl/worksheets/sheet1.xml", "rId1")?.as_deref(),
            Some("xl/drawings/drawing1.xml")
        );
        assert_eq!(package.resolve("xl/worksheets/sheet1.xml", "rId2")?, None);
        Ok(())
    }

    #[test]
    fn missing_relationships_part_is_empty() -> Result<(), ExtractError> {
        let mut package = PackageBuilder::workbook(&["Sheet1"]).into_package()?;
        assert!(package.relationships("xl/styles.xml")?.is_empty());
        Ok(())
    }

    #[test]
    fn main_part_and_missing_parts() -> Result<(), ExtractError> {
        let mut package = PackageBuilder::workbook(&["Sheet1"]).into_package()?;
        assert_eq!(package.main_part()?.as_deref(), Some("xl/workbook.xml"));
        assert!(package.contains("xl/worksheets/sheet1.xml"));
        assert!(matches!(
            package.require_xml_reader("xl/missing.xml"),
            Err(ExtractError::SpreadsheetError(SpreadsheetError::PartNotFound(_)))
        ));
        Ok(())
    }
}
