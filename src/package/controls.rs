//! Recovery of embedded form controls (checkboxes) and drawing captions.
//!
//! Control metadata is spread over several parts: the worksheet declares each
//! control with a relationship id, the worksheet's drawing carries the caption
//! text keyed by shape name, and a control property part holds the checked
//! state. Each source is read into its own partial table and the tables are
//! merged once into immutable [`Control`] values.
//!
//! Enrichment is best effort: a missing or unreadable drawing or property part
//! leaves the affected controls with `text == None` and `checked == false`.

use crate::error::ExtractError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlTextContextHelper;
use crate::match_xml_events;
use crate::package::relationships::Relationships;
use crate::package::Package;
use indexmap::IndexMap;
use log::debug;
use log::warn;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::Read;
use std::io::Seek;

// Worksheet elements
const TAG_CONTROL: &[u8] = b"control";
const TAG_DRAWING: &[u8] = b"drawing";

// Drawing elements
const TAG_ABSOLUTE_ANCHOR: &[u8] = b"absoluteAnchor";
const TAG_ABSOLUTE_CELL_ANCHOR: &[u8] = b"absoluteCellAnchor";
const TAG_ONE_CELL_ANCHOR: &[u8] = b"oneCellAnchor";
const TAG_TWO_CELL_ANCHOR: &[u8] = b"twoCellAnchor";
const TAG_NON_VISUAL_PROPERTIES: &[u8] = b"cNvPr";
const TAG_TEXT: &[u8] = b"t";

/// Attribute value marking a checked checkbox in a control property part
const CHECKED: &str = "Checked";

/// A form control of a worksheet with its recovered caption and state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Control {
    /// Control name, unique within a sheet (e.g. `Check Box 5`)
    pub name: String,
    /// Relationship id of the control property part
    pub relationship_id: Option<String>,
    pub shape_id: Option<String>,
    /// Caption text from the drawing layer
    pub text: Option<String>,
    pub checked: bool,
}

/// Controls and free-standing textbox captions recovered for one sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetControls {
    pub controls: IndexMap<String, Control>,
    /// Captions of drawing shapes that are not controls, keyed by shape name
    pub textboxes: IndexMap<String, String>,
}

/// A control as declared by the worksheet part, before enrichment.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ControlDeclaration {
    name: String,
    relationship_id: Option<String>,
    shape_id: Option<String>,
}

/// Control declarations and drawing references found in a worksheet part.
#[derive(Debug, Default)]
struct SheetDeclarations {
    controls: Vec<ControlDeclaration>,
    drawings: Vec<String>,
}

/// Recovers controls and textbox captions for the worksheet stored at `sheet_part`.
///
/// Fails only when the worksheet part itself cannot be read. Enrichment is
/// skipped entirely unless the worksheet references exactly one drawing.
pub fn recover<R: Read + Seek>(package: &mut Package<R>, sheet_part: &str) -> Result<SheetControls, ExtractError> {
    let declarations = read_declarations(package, sheet_part)?;
    if declarations.controls.is_empty() && declarations.drawings.is_empty() {
        return Ok(SheetControls::default());
    }
    if declarations.drawings.len() != 1 {
        debug!(
            "Worksheet '{sheet_part}' references {} drawings, skipping control enrichment",
            declarations.drawings.len()
        );
        return Ok(merge(declarations.controls, IndexMap::new(), HashMap::new()));
    }

    let relationships = match package.relationships(sheet_part) {
        Ok(relationships) => relationships,
        Err(error) => {
            warn!("Cannot read relationships of '{sheet_part}': {error}");
            return Ok(merge(declarations.controls, IndexMap::new(), HashMap::new()));
        }
    };

    let captions = match relationships.target(&declarations.drawings[0]) {
        Some(drawing_part) => read_captions(package, drawing_part).unwrap_or_else(|error| {
            warn!("Cannot read drawing '{drawing_part}' of '{sheet_part}': {error}");
            IndexMap::new()
        }),
        None => {
            warn!("Drawing relationship '{}' of '{sheet_part}' not found", declarations.drawings[0]);
            IndexMap::new()
        }
    };

    let states = read_states(package, &relationships, &declarations.controls);
    Ok(merge(declarations.controls, captions, states))
}

/// Reads `control` and `drawing` elements from a worksheet part.
fn read_declarations<R: Read + Seek>(package: &mut Package<R>, sheet_part: &str) -> Result<SheetDeclarations, ExtractError> {
    let mut reader = package.require_xml_reader(sheet_part)?;
    let mut declarations = SheetDeclarations::default();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_CONTROL => {
            if let Some(name) = event.get_attribute_value("name")? {
                declarations.controls.push(ControlDeclaration {
                    name: name.to_string(),
                    relationship_id: event.get_local_attribute_value("id")?.map(|id| id.to_string()),
                    shape_id: event.get_attribute_value("shapeId")?.map(|id| id.to_string()),
                });
            }
        }
        Event::Start(event) if event.local_name().as_ref() == TAG_DRAWING => {
            if let Some(id) = event.get_local_attribute_value("id")? {
                declarations.drawings.push(id.to_string());
            }
        }
    });
    Ok(declarations)
}

fn is_anchor(local_name: &[u8]) -> bool {
    matches!(
        local_name,
        TAG_ABSOLUTE_ANCHOR | TAG_ABSOLUTE_CELL_ANCHOR | TAG_ONE_CELL_ANCHOR | TAG_TWO_CELL_ANCHOR
    )
}

/// Reads the first shape name and first text run of every anchor in a drawing part.
///
/// Anchors without a text run are ignored. A later anchor with the same shape
/// name replaces an earlier one.
fn read_captions<R: Read + Seek>(package: &mut Package<R>, drawing_part: &str) -> Result<IndexMap<String, String>, ExtractError> {
    let mut reader = package.require_xml_reader(drawing_part)?;
    let mut captions = IndexMap::new();
    let mut in_anchor = false;
    let mut in_text = false;
    let mut name = None::<String>;
    let mut text = None::<String>;
    let mut buffer = String::new();
    match_xml_events!(reader => {
        Event::Start(event) if is_anchor(event.local_name().as_ref()) => {
            in_anchor = true;
            name = None;
            text = None;
        }
        Event::End(event) if in_anchor && is_anchor(event.local_name().as_ref()) => {
            in_anchor = false;
            match (name.take(), text.take()) {
                (Some(name), Some(text)) => {
                    captions.insert(name, text);
                }
                (None, Some(text)) => debug!("Caption '{text}' in '{drawing_part}' has no shape name"),
                _ => (),
            }
        }
        Event::Start(event) if in_anchor && name.is_none() && event.local_name().as_ref() == TAG_NON_VISUAL_PROPERTIES => {
            name = event.get_attribute_value("name")?.map(|name| name.to_string());
        }
        Event::Start(event) if in_anchor && text.is_none() && event.local_name().as_ref() == TAG_TEXT => {
            in_text = true;
            buffer.clear();
        }
        Event::End(event) if in_text && event.local_name().as_ref() == TAG_TEXT => {
            in_text = false;
            text = Some(std::mem::take(&mut buffer));
        }
        Event::Text(event) if in_text => buffer.push_bytes_text(&event)?,
        Event::CData(event) if in_text => buffer.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if in_text => buffer.push_bytes_ref(&event)?,
    });
    Ok(captions)
}

/// Reads the checked state of each declared control from its property part.
fn read_states<R: Read + Seek>(
    package: &mut Package<R>,
    relationships: &Relationships,
    controls: &[ControlDeclaration],
) -> HashMap<String, bool> {
    let mut states = HashMap::new();
    for control in controls {
        let Some(id) = control.relationship_id.as_deref() else {
            continue;
        };
        let Some(property_part) = relationships.target(id) else {
            warn!("Property relationship '{id}' of control '{}' not found", control.name);
            continue;
        };
        match read_checked(package, property_part) {
            Ok(checked) => {
                states.insert(control.name.to_owned(), checked);
            }
            Err(error) => warn!("Cannot read property part '{property_part}' of control '{}': {error}", control.name),
        }
    }
    states
}

/// True when the root element of a control property part has `checked="Checked"`.
fn read_checked<R: Read + Seek>(package: &mut Package<R>, property_part: &str) -> Result<bool, ExtractError> {
    let mut reader = package.require_xml_reader(property_part)?;
    while let Some(event) = reader.next()? {
        if let Event::Start(event) = event {
            let checked = event.get_attribute_value("checked")?;
            return Ok(checked.as_deref() == Some(CHECKED));
        }
    }
    Ok(false)
}

/// Merges declarations, captions and states into final controls; unmatched captions become textboxes.
fn merge(
    declarations: Vec<ControlDeclaration>,
    mut captions: IndexMap<String, String>,
    states: HashMap<String, bool>,
) -> SheetControls {
    let mut controls = IndexMap::new();
    for declaration in declarations {
        let text = captions.shift_remove(&declaration.name);
        let checked = states.get(&declaration.name).copied().unwrap_or(false);
        controls.insert(declaration.name.to_owned(), Control {
            name: declaration.name,
            relationship_id: declaration.relationship_id,
            shape_id: declaration.shape_id,
            text,
            checked,
        });
    }
    SheetControls {
        controls,
        textboxes: captions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::PackageBuilder;

    const SHEET: &str = "xl/worksheets/sheet1.xml";

    fn sheet_with_controls(controls: &[(&str, &str)], drawings: &[&str]) -> String {
        let mut body = String::from("<sheetData/>");
        for id in drawings {
            body.push_str(&format!(r#"<drawing r:id="{id}"/>"#));
        }
        body.push_str(r#"<mc:AlternateContent xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><mc:Choice Requires="x14"><controls>"#);
        for (index, (name, id)) in controls.iter().enumerate() {
            body.push_str(&format!(
                r#"<mc:AlternateContent><mc:Choice Requires="x14"><control shapeId="{}" r:id="{id}" name="{name}"><controlPr defaultSize="0"/></control></mc:Choice></mc:AlternateContent>"#,
                1025 + index
            ));
        }
        body.push_str("</controls></mc:Choice></mc:AlternateContent>");
        PackageBuilder::worksheet(&body)
    }

    fn drawing(anchors: &[(&str, Option<&str>)]) -> String {
        let mut xml = String::from(
            r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
        );
        for (index, (name, text)) in anchors.iter().enumerate() {
            let kind = ["twoCellAnchor", "oneCellAnchor", "absoluteAnchor"][index % 3];
            let body = text
                .map(|text| format!("<xdr:txBody><a:p><a:r><a:t>{text}</a:t></a:r></a:p></xdr:txBody>"))
                .unwrap_or_default();
            xml.push_str(&format!(
                r#"<xdr:{kind}><xdr:sp><xdr:nvSpPr><xdr:cNvPr id="{}" name="{name}"/></xdr:nvSpPr>{body}</xdr:sp><xdr:clientData/></xdr:{kind}>"#,
                index + 2
            ));
        }
        xml.push_str("</xdr:wsDr>");
        xml
    }

    fn property(checked: Option<&str>) -> String {
        let checked = checked.map(|value| format!(r#" checked="{value}""#)).unwrap_or_default();
        format!(
            r#"<formControlPr xmlns="http://schemas.microsoft.com/office/spreadsheetml/2009/9/main" objectType="CheckBox"{checked} lockText="1"/>"#
        )
    }

    fn builder() -> PackageBuilder {
        PackageBuilder::workbook(&["Envelope"])
            .part(SHEET, &sheet_with_controls(&[("Check Box 5", "rId2"), ("Check Box 6", "rId3"), ("Check Box 7", "rId4")], &["rId1"]))
            .part(
                "xl/worksheets/_rels/sheet1.xml.rels",
                &PackageBuilder::relationships(&[
                    ("rId1", "drawing", "../drawings/drawing1.xml"),
                    ("rId2", "ctrlProp", "../ctrlProps/ctrlProp1.xml"),
                    ("rId3", "ctrlProp", "../ctrlProps/ctrlProp2.xml"),
                    ("rId4", "ctrlProp", "../ctrlProps/ctrlProp3.xml"),
                ]),
            )
            .part(
                "xl/drawings/drawing1.xml",
                &drawing(&[
                    ("Check Box 5", Some("Electronic")),
                    ("Check Box 6", Some("Magnetic &amp; other")),
                    ("TextBox 89", Some("Ground source")),
                    ("Picture 1", None),
                ]),
            )
            .part("xl/ctrlProps/ctrlProp1.xml", &property(Some("Checked")))
            .part("xl/ctrlProps/ctrlProp2.xml", &property(Some("Unchecked")))
            .part("xl/ctrlProps/ctrlProp3.xml", &property(None))
    }

    #[test]
    fn recovers_captions_and_states() -> Result<(), ExtractError> {
        let mut package = builder().into_package()?;
        let recovered = recover(&mut package, SHEET)?;

        let names: Vec<&str> = recovered.controls.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Check Box 5", "Check Box 6", "Check Box 7"]);

        let control = &recovered.controls["Check Box 5"];
        assert!(control.checked);
        assert_eq!(control.text.as_deref(), Some("Electronic"));
        assert_eq!(control.relationship_id.as_deref(), Some("rId2"));
        assert_eq!(control.shape_id.as_deref(), Some("1025"));

        let control = &recovered.controls["Check Box 6"];
        assert!(!control.checked);
        assert_eq!(control.text.as_deref(), Some("Magnetic & other"));

        let control = &recovered.controls["Check Box 7"];
        assert!(!control.checked);
        assert_eq!(control.text, None);

        assert_eq!(recovered.textboxes.len(), 1);
        assert_eq!(recovered.textboxes["TextBox 89"], "Ground source");
        Ok(())
    }

    #[test]
    fn missing_property_part_degrades_one_control() -> Result<(), ExtractError> {
        let mut package = builder()
            .part(
                "xl/worksheets/_rels/sheet1.xml.rels",
                &PackageBuilder::relationships(&[
                    ("rId1", "drawing", "../drawings/drawing1.xml"),
                    ("rId2", "ctrlProp", "../ctrlProps/ctrlProp1.xml"),
                    ("rId3", "ctrlProp", "../ctrlProps/missing.xml"),
                ]),
            )
            .into_package()?;
        let recovered = recover(&mut package, SHEET)?;
        assert!(recovered.controls["Check Box 5"].checked);
        assert!(!recovered.controls["Check Box 6"].checked);
        assert_eq!(recovered.controls["Check Box 6"].text.as_deref(), Some("Magnetic & other"));
        assert!(!recovered.controls["Check Box 7"].checked);
        Ok(())
    }

    #[test]
    fn missing_drawing_keeps_states() -> Result<(), ExtractError> {
        let mut package = builder()
            .part(
                "xl/worksheets/_rels/sheet1.xml.rels",
                &PackageBuilder::relationships(&[
                    ("rId1", "drawing", "../drawings/gone.xml"),
                    ("rId2", "ctrlProp", "../ctrlProps/ctrlProp1.xml"),
                ]),
            )
            .into_package()?;
        let recovered = recover(&mut package, SHEET)?;
        let control = &recovered.controls["Check Box 5"];
        assert!(control.checked);
        assert_eq!(control.text, None);
        assert!(recovered.textboxes.is_empty());
        Ok(())
    }

    #[test]
    fn enrichment_needs_exactly_one_drawing() -> Result<(), ExtractError> {
        let mut package = builder()
            .part(SHEET, &sheet_with_controls(&[("Check Box 5", "rId2")], &[]))
            .into_package()?;
        let recovered = recover(&mut package, SHEET)?;
        let control = &recovered.controls["Check Box 5"];
        assert!(!control.checked);
        assert_eq!(control.text, None);

        let mut package = builder()
            .part(SHEET, &sheet_with_controls(&[("Check Box 5", "rId2")], &["rId1", "rId1"]))
            .into_package()?;
        let recovered = recover(&mut package, SHEET)?;
        assert!(!recovered.controls["Check Box 5"].checked);
        Ok(())
    }

    #[test]
    fn sheet_without_controls() -> Result<(), ExtractError> {
        let mut package = PackageBuilder::workbook(&["Plain"]).into_package()?;
        assert_eq!(recover(&mut package, SHEET)?, SheetControls::default());
        Ok(())
    }

    #[test]
    fn missing_worksheet_is_an_error() -> Result<(), ExtractError> {
        let mut package = PackageBuilder::workbook(&["Plain"]).into_package()?;
        assert!(recover(&mut package, "xl/worksheets/sheet9.xml").is_err());
        Ok(())
    }
}
