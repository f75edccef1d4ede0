//! ZIP archive helper utilities for Office Open XML packages
//! Provides convenient methods for accessing parts within ZIP archives

use crate::error::ExtractError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

/// Helper trait for ZIP archive operations with specialized reader creation
pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Gets a file from the ZIP archive by name (case-insensitive, path separator agnostic)
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, ExtractError>;

    /// Checks whether a file exists in the ZIP archive
    fn contains(&self, name: &str) -> bool;

    /// Creates an XML reader for a file within the ZIP archive
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, ExtractError>;
}

/// Finds the stored entry name matching `name`, ignoring case, separators and a leading slash
fn find_entry<'a>(mut names: impl Iterator<Item = &'a str>, name: &str) -> Option<&'a str> {
    let pattern = name.replace('\\', "/");
    let pattern = pattern.trim_start_matches('/');
    names.find(|file_name| pattern.eq_ignore_ascii_case(file_name.trim_start_matches('/')))
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, ExtractError> {
        let path = find_entry(self.file_names(), name).map(|file_name| file_name.to_owned());
        match path.map(|file_name| self.by_name(&file_name)).transpose() {
            Ok(Some(file)) => Ok(Some(file)),
            Ok(None) | Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }

    fn contains(&self, name: &str) -> bool {
        find_entry(self.file_names(), name).is_some()
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, ExtractError> {
        let reader = self
            .file(name)?
            .map(|file| XmlReader::new(BufReader::new(file)));
        Ok(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_lookup_is_case_and_separator_insensitive() {
        let names = ["[Content_Types].xml", "xl/worksheets/Sheet1.xml", "xl/_rels/workbook.xml.rels"];
        assert_eq!(
            find_entry(names.iter().copied(), "XL\\worksheets\\sheet1.xml"),
            Some("xl/worksheets/Sheet1.xml")
        );
        assert_eq!(
            find_entry(names.iter().copied(), "/xl/_rels/workbook.xml.rels"),
            Some("xl/_rels/workbook.xml.rels")
        );
        assert_eq!(find_entry(names.iter().copied(), "xl/styles.xml"), None);
    }
}
