use crate::error::ExtractError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::cell::FillMarker;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::scalar::Scalar;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::styles::Styles;
use crate::spreadsheet::SpreadsheetError;
use log::debug;
use quick_xml::events::Event;
use std::io::BufRead;

// XML tag names for parsing Excel XLSX format
const TAG_SHARED_STRING_ITEM: &[u8] = b"si"; // Shared string table item
const TAG_PHONETIC_TEXT: &[u8] = b"rPh"; // Phonetic text for Asian languages
const TAG_TEXT: &[u8] = b"t"; // Text content within strings
const TAG_WORKBOOK_PROPERTIES: &[u8] = b"workbookPr"; // Workbook properties
const TAG_SHEET: &[u8] = b"sheet"; // Worksheet definition
const TAG_ROW: &[u8] = b"row"; // Row in worksheet
const TAG_CELL: &[u8] = b"c"; // Cell in worksheet
const TAG_INLINE_STRING: &[u8] = b"is"; // Inline string value
const TAG_VALUE: &[u8] = b"v"; // Cell value content
const TAG_FORMULA: &[u8] = b"f"; // Cell formula

/// Reads sheet declarations from the workbook part.
///
/// Returns the `(name, relationship id)` pairs in workbook order and whether
/// the workbook uses the 1904 date system.
pub(crate) fn read_workbook<B: BufRead>(reader: &mut XmlReader<B>) -> Result<(Vec<(String, String)>, bool), ExtractError> {
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_SHEET => {
            let name = event.get_attribute_value("name")?;
            let id = event.get_local_attribute_value("id")?;
            if let Some((name, id)) = name.zip(id) {
                sheets.push((name.to_string(), id.to_string()));
            }
        }
        Event::Start(event) if event.local_name().as_ref() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Reads the shared string table.
///
/// Rich text runs are concatenated; phonetic runs are skipped.
pub(crate) fn read_shared_strings<B: BufRead>(reader: &mut XmlReader<B>) -> Result<Vec<String>, ExtractError> {
    let mut shared_strings = Vec::<String>::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_SHARED_STRING_ITEM => {
            let string = read_string_value(reader, TAG_SHARED_STRING_ITEM, false)?;
            shared_strings.push(string);
        }
    });
    Ok(shared_strings)
}

/// Reads a worksheet part into a [`Sheet`].
///
/// Every cell with a value or a style is stored, so styled empty cells keep
/// their fill marker. Formula cells hold `=` followed by the formula text
/// unless `data_only` is set or the formula text is empty (dependents of a
/// shared formula), in which case the cached result is used.
pub(crate) fn read_sheet<B: BufRead>(
    reader: &mut XmlReader<B>,
    name: &str,
    shared_strings: &[String],
    styles: &Styles,
    data_only: bool,
) -> Result<Sheet, ExtractError> {
    let mut sheet = Sheet::new(name);
    let mut row_count = 0u32;
    let mut col_count = 0u32;
    let mut row = 0u32;
    let mut col = 0u32;
    let mut in_cell = false;
    let mut kind = CellType::default();
    let mut fill = FillMarker::default();
    let mut styled = false;
    let mut value = None::<String>;
    let mut formula = String::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_ROW => {
            row_count = event.parse_attribute_value::<u32>("r")?.unwrap_or(row_count.saturating_add(1));
            col_count = 0;
        }
        Event::Start(event) if event.local_name().as_ref() == TAG_CELL => {
            (col, row) = event.get_attribute_value("r")?
                .and_then(|reference| reference_to_index(&reference))
                .unwrap_or((col_count.saturating_add(1), row_count.max(1)));
            col_count = col;
            in_cell = true;
            value = None;
            formula.clear();
            kind = event.get_attribute_value("t")?.map(|t| {
                match t.as_ref() {
                    "inlineStr" | "str" => CellType::InlineString,
                    "s" => CellType::SharedString,
                    "d" => CellType::IsoDateTime,
                    "b" => CellType::Boolean,
                    "e" => CellType::Error,
                    _ => CellType::Number,
                }
            }).unwrap_or(CellType::Number);
            (fill, styled) = match event.parse_attribute_value::<usize>("s")? {
                Some(index) => {
                    if kind == CellType::Number {
                        kind = styles.cell_type(index);
                    }
                    (styles.fill(index), true)
                }
                None => (FillMarker::None, false),
            };
        }
        Event::Start(event) if in_cell && event.local_name().as_ref() == TAG_INLINE_STRING => {
            value = Some(read_string_value(reader, TAG_INLINE_STRING, false)?);
        }
        Event::Start(event) if in_cell && event.local_name().as_ref() == TAG_VALUE => {
            value = Some(read_string_value(reader, TAG_VALUE, true)?);
        }
        Event::Start(event) if in_cell && event.local_name().as_ref() == TAG_FORMULA => {
            formula = read_string_value(reader, TAG_FORMULA, true)?;
        }
        Event::End(event) if in_cell && event.local_name().as_ref() == TAG_CELL => {
            in_cell = false;
            let scalar = if !data_only && !formula.is_empty() {
                Scalar::Text(format!("={formula}"))
            } else {
                match value.take() {
                    Some(raw) => to_scalar(kind, &raw, shared_strings).map_err(|_| SpreadsheetError::CellValueError {
                        sheet: name.to_owned(),
                        reference: index_to_reference(col, row),
                        value: raw.to_owned(),
                    })?,
                    None => Scalar::Empty,
                }
            };
            if !scalar.is_empty() || styled {
                sheet.push(Cell {
                    col,
                    row,
                    value: scalar,
                    fill: std::mem::take(&mut fill),
                });
            }
        }
    });
    debug!("Sheet '{name}': {} cells, extent {}x{}", sheet.len(), sheet.max_col(), sheet.max_row());
    Ok(sheet)
}

/// Converts the raw text of a cell value, resolving shared string indexes.
fn to_scalar(kind: CellType, raw: &str, shared_strings: &[String]) -> Result<Scalar, ExtractError> {
    match kind {
        CellType::SharedString => {
            let index = raw.trim().parse::<usize>()?;
            match shared_strings.get(index) {
                Some(text) => Ok(Scalar::Text(text.to_owned())),
                None => Err(SpreadsheetError::PartNotFound(format!("shared string #{index}")))?,
            }
        }
        CellType::Number | CellType::NumberDateTime1900 | CellType::NumberDateTime1904 if raw.trim().is_empty() => {
            Ok(Scalar::Empty)
        }
        _ => kind.to_scalar(raw),
    }
}

/// Text of the element being read, up to its `end_tag`.
///
/// Only `<t>` runs count unless `is_text_content` is set, in which case the
/// element's own character data is taken too. Phonetic runs (`<rPh>`) are skipped.
fn read_string_value<B: BufRead>(
    reader: &mut XmlReader<B>,
    end_tag: &[u8],
    is_text_content: bool,
) -> Result<String, ExtractError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.local_name().as_ref() == end_tag => break,
        Event::Start(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.local_name().as_ref() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.local_name().as_ref() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_bytes_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
