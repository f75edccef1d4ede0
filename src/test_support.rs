//! In-memory XLSX packages for unit tests.
use crate::error::ExtractError;
use crate::package::Package;
use crate::spreadsheet::options::LoadOptions;
use crate::spreadsheet::Workbook;
use std::io::Cursor;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const RELATIONSHIP_TYPE_PREFIX: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/";

/// Builds a ZIP package part by part; later parts replace earlier ones with the same path.
#[derive(Clone, Debug, Default)]
pub(crate) struct PackageBuilder {
    parts: Vec<(String, String)>,
}

impl PackageBuilder {
    /// A minimal workbook with one empty worksheet per name at `xl/worksheets/sheetN.xml`.
    pub(crate) fn workbook(sheet_names: &[&str]) -> Self {
        let mut sheets = String::new();
        let mut relationships = Vec::new();
        let mut builder = PackageBuilder::default();
        for (index, name) in sheet_names.iter().enumerate() {
            let number = index + 1;
            sheets.push_str(&format!(r#"<sheet name="{name}" sheetId="{number}" r:id="rId{number}"/>"#));
            relationships.push((format!("rId{number}"), "worksheet", format!("worksheets/sheet{number}.xml")));
            builder = builder.part(
                &format!("xl/worksheets/sheet{number}.xml"),
                &Self::worksheet("<sheetData/>"),
            );
        }
        let relationships: Vec<(&str, &str, &str)> = relationships
            .iter()
            .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
            .collect();
        builder
            .part(
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#,
            )
            .part("_rels/.rels", &Self::relationships(&[("rId1", "officeDocument", "xl/workbook.xml")]))
            .part(
                "xl/workbook.xml",
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr/><sheets>{sheets}</sheets></workbook>"#
                ),
            )
            .part("xl/_rels/workbook.xml.rels", &Self::relationships(&relationships))
    }

    /// Adds or replaces a part.
    pub(crate) fn part(mut self, path: &str, content: &str) -> Self {
        self.parts.retain(|(existing, _)| existing != path);
        self.parts.push((path.to_owned(), content.to_owned()));
        self
    }

    /// A relationships part; each entry is `(id, type suffix, target)`.
    pub(crate) fn relationships(entries: &[(&str, &str, &str)]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, kind, target) in entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{id}" Type="{RELATIONSHIP_TYPE_PREFIX}{kind}" Target="{target}"/>"#
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    /// Wraps worksheet content in a `worksheet` root with the usual namespaces.
    pub(crate) fn worksheet(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{body}</worksheet>"#
        )
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, content) in &self.parts {
            writer.start_file(path.as_str(), SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub(crate) fn into_package(self) -> Result<Package<Cursor<Vec<u8>>>, ExtractError> {
        Package::new(Cursor::new(self.into_bytes()))
    }

    pub(crate) fn into_workbook(self, options: &LoadOptions) -> Result<Workbook, ExtractError> {
        Workbook::from_reader(Cursor::new(self.into_bytes()), options)
    }
}
