//! Per-part relationship tables of an Open Packaging Conventions archive.
//!
//! A part `dir/name.xml` keeps its relationships in `dir/_rels/name.xml.rels`.
//! Internal targets are stored resolved to package part paths (no leading slash,
//! `/` separators, `.` and `..` segments collapsed against the owning part's
//! directory); external targets are kept verbatim.

use crate::error::ExtractError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::match_xml_events;
use indexmap::IndexMap;
use quick_xml::events::Event;
use std::io::BufRead;

/// XML tag name for relationship elements
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Whether a relationship points inside the package or at an external resource.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

/// One entry of a relationship table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id, e.g. `rId3`
    pub id: String,
    /// Relationship type URI
    pub kind: String,
    /// Resolved part path for internal targets, raw reference for external ones
    pub target: String,
    pub mode: TargetMode,
}

/// Relationship table of a single part, keyed by relationship id in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relationships {
    owner: String,
    items: IndexMap<String, Relationship>,
}

impl Relationships {
    /// Creates an empty table for a part that has no relationships part.
    pub fn empty(owner: &str) -> Self {
        Relationships {
            owner: owner.to_owned(),
            items: IndexMap::new(),
        }
    }

    /// Parses a `.rels` part belonging to `owner`.
    pub(crate) fn parse<B: BufRead>(reader: &mut XmlReader<B>, owner: &str) -> Result<Self, ExtractError> {
        let mut table = Self::empty(owner);
        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
                let id = event.get_attribute_value("Id")?;
                let kind = event.get_attribute_value("Type")?.unwrap_or_default();
                let target = event.get_attribute_value("Target")?;
                let mode = match event.get_attribute_value("TargetMode")? {
                    Some(mode) if mode.eq_ignore_ascii_case("External") => TargetMode::External,
                    _ => TargetMode::Internal,
                };
                if let Some((id, target)) = id.zip(target) {
                    let target = match mode {
                        TargetMode::Internal => resolve_target(owner, &target),
                        TargetMode::External => target.to_string(),
                    };
                    table.items.insert(id.to_string(), Relationship {
                        id: id.to_string(),
                        kind: kind.to_string(),
                        target,
                        mode,
                    });
                }
            }
        });
        Ok(table)
    }

    /// Path of the part owning this table.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.get(id)
    }

    /// Resolved part path of an internal relationship, or `None` when the id is unknown or external.
    pub fn target(&self, id: &str) -> Option<&str> {
        self.items
            .get(id)
            .filter(|relationship| relationship.mode == TargetMode::Internal)
            .map(|relationship| relationship.target.as_str())
    }

    /// Relationships whose type URI ends with `suffix` (e.g. `/worksheet`).
    pub fn by_type<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.items.values().filter(move |relationship| relationship.kind.ends_with(suffix))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Path of the relationships part that belongs to `part`.
///
/// The package root (empty path or `/`) maps to `_rels/.rels`.
pub fn relationships_part(part: &str) -> String {
    let part = normalize_path(part);
    match part.rsplit_once('/') {
        Some((directory, name)) => format!("{directory}/_rels/{name}.rels"),
        None if part.is_empty() => "_rels/.rels".to_owned(),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolves a relationship target against the part that owns the relationship.
///
/// Targets starting with `/` are package-absolute; anything else is relative to
/// the owning part's directory.
pub fn resolve_target(owner: &str, target: &str) -> String {
    let target = target.replace('\\', "/");
    if target.starts_with('/') {
        return normalize_path(&target);
    }
    let owner = owner.replace('\\', "/");
    match owner.trim_start_matches('/').rsplit_once('/') {
        Some((directory, _)) => normalize_path(&format!("{directory}/{target}")),
        None => normalize_path(&target),
    }
}

/// Collapses `.`, `..` and empty segments; the result never starts with `/`.
pub(crate) fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => (),
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SHEET_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/ctrlProp" Target="../ctrlProps/ctrlProp1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing1.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/a/../b" TargetMode="External"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/printerSettings" Target="/xl/printerSettings/printerSettings1.bin"/>
</Relationships>"#;

    fn parse(xml: &str, owner: &str) -> Result<Relationships, ExtractError> {
        let mut reader = XmlReader::new(Cursor::new(xml.as_bytes()));
        Relationships::parse(&mut reader, owner)
    }

    #[test]
    fn resolves_parent_directory_segments() {
        assert_eq!(
            resolve_target("xl/worksheets/sheet1.xml", "../drawings/drawing1.xml"),
            "xl/drawings/drawing1.xml"
        );
        assert_eq!(resolve_target("xl/workbook.xml", "worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
        assert_eq!(resolve_target("xl/workbook.xml", "./styles.xml"), "xl/styles.xml");
        assert_eq!(resolve_target("", "xl/workbook.xml"), "xl/workbook.xml");
    }

    #[test]
    fn resolves_absolute_and_backslash_targets() {
        assert_eq!(resolve_target("xl/worksheets/sheet1.xml", "/xl/drawings/drawing1.xml"), "xl/drawings/drawing1.xml");
        assert_eq!(
            resolve_target("xl\\worksheets\\sheet1.xml", "..\\ctrlProps\\ctrlProp2.xml"),
            "xl/ctrlProps/ctrlProp2.xml"
        );
    }

    #[test]
    fn relationships_part_paths() {
        assert_eq!(relationships_part("xl/worksheets/sheet1.xml"), "xl/worksheets/_rels/sheet1.xml.rels");
        assert_eq!(relationships_part("/xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
        assert_eq!(relationships_part(""), "_rels/.rels");
    }

    #[test]
    fn parse_table() -> Result<(), ExtractError> {
        let table = parse(SHEET_RELS, "xl/worksheets/sheet1.xml")?;
        assert_eq!(table.len(), 4);
        assert_eq!(table.owner(), "xl/worksheets/sheet1.xml");
        assert_eq!(table.target("rId2"), Some("xl/drawings/drawing1.xml"));
        assert_eq!(table.target("rId3"), Some("xl/ctrlProps/ctrlProp1.xml"));
        assert_eq!(table.target("rId4"), Some("xl/printerSettings/printerSettings1.bin"));
        assert_eq!(table.target("rId9"), None);

        let external = table.get("rId1").unwrap();
        assert_eq!(external.mode, TargetMode::External);
        assert_eq!(external.target, "https://example.com/a/../b");
        assert_eq!(table.target("rId1"), None);

        let drawings: Vec<&str> = table.by_type("/drawing").map(|relationship| relationship.id.as_str()).collect();
        assert_eq!(drawings, vec!["rId2"]);
        Ok(())
    }
}
