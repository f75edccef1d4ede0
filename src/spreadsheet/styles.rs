//! Cell format table of the workbook styles part
use crate::error::ExtractError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::match_xml_events;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::cell::FillMarker;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::BufRead;

// XML tag names of the styles part
const TAG_CUSTOM_FORMATS: &[u8] = b"numFmts"; // Custom number formats container
const TAG_CUSTOM_FORMAT: &[u8] = b"numFmt"; // Individual custom number format
const TAG_FILLS: &[u8] = b"fills"; // Fill definitions container
const TAG_FILL: &[u8] = b"fill"; // Individual fill definition
const TAG_PATTERN_FILL: &[u8] = b"patternFill"; // Pattern fill of a fill definition
const TAG_FOREGROUND_COLOR: &[u8] = b"fgColor"; // Foreground colour of a pattern fill
const TAG_FORMAT_INDEXES: &[u8] = b"cellXfs"; // Cell format indexes container
const TAG_FORMAT_INDEX: &[u8] = b"xf"; // Individual cell format index

/// Number format kind and fill marker of every cell format, indexed by the `s` attribute of cells.
#[derive(Clone, Debug, Default)]
pub(crate) struct Styles {
    formats: Vec<CellType>,
    fills: Vec<FillMarker>,
}

impl Styles {
    /// Parses the styles part.
    pub(crate) fn parse<B: BufRead>(reader: &mut XmlReader<B>, is_1904: bool) -> Result<Self, ExtractError> {
        let mut custom_formats_context = false;
        let mut custom_formats = HashMap::<String, CellType>::new();

        let mut fills_context = false;
        let mut pattern_context = false;
        let mut fills = Vec::<FillMarker>::new();

        let mut format_indexes_context = false;
        let mut format_indexes = Vec::<(String, usize)>::new();

        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
            Event::End(event) if event.local_name().as_ref() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
            Event::Start(event) if custom_formats_context && event.local_name().as_ref() == TAG_CUSTOM_FORMAT => {
                let id = event.get_attribute_value("numFmtId")?;
                let format = event.get_attribute_value("formatCode")?;
                if let Some((id, format)) = id.zip(format) {
                    let style = CellType::parse_custom_number_format(&format, is_1904);
                    custom_formats.insert(id.to_string(), style);
                }
            }

            Event::Start(event) if event.local_name().as_ref() == TAG_FILLS => fills_context = true,
            Event::End(event) if event.local_name().as_ref() == TAG_FILLS => fills_context = false,
            Event::Start(event) if fills_context && event.local_name().as_ref() == TAG_FILL => fills.push(FillMarker::None),
            Event::Start(event) if fills_context && event.local_name().as_ref() == TAG_PATTERN_FILL => pattern_context = true,
            Event::End(event) if fills_context && event.local_name().as_ref() == TAG_PATTERN_FILL => pattern_context = false,
            Event::Start(event) if pattern_context && event.local_name().as_ref() == TAG_FOREGROUND_COLOR => {
                if let Some(fill) = fills.last_mut() {
                    *fill = parse_color(&event)?;
                }
            }

            Event::Start(event) if event.local_name().as_ref() == TAG_FORMAT_INDEXES => format_indexes_context = true,
            Event::End(event) if event.local_name().as_ref() == TAG_FORMAT_INDEXES => format_indexes_context = false,
            Event::Start(event) if format_indexes_context && event.local_name().as_ref() == TAG_FORMAT_INDEX => {
                let id = event.get_attribute_value("numFmtId")?.unwrap_or_default().to_string();
                let fill_id = event.parse_attribute_value::<usize>("fillId")?.unwrap_or_default();
                format_indexes.push((id, fill_id));
            }
        });

        let mut styles = Styles::default();
        for (id, fill_id) in format_indexes {
            let format = custom_formats
                .get(&id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(&id, is_1904))
                .unwrap_or(CellType::Number);
            styles.formats.push(format);
            styles.fills.push(fills.get(fill_id).cloned().unwrap_or_default());
        }
        Ok(styles)
    }

    /// Value kind of a numeric cell using cell format `index`.
    pub(crate) fn cell_type(&self, index: usize) -> CellType {
        self.formats.get(index).copied().unwrap_or(CellType::Number)
    }

    /// Fill marker of cell format `index`.
    pub(crate) fn fill(&self, index: usize) -> FillMarker {
        self.fills.get(index).cloned().unwrap_or_default()
    }
}

/// Reads a colour element; `auto` wins over `indexed`, then `theme`, then `rgb`.
fn parse_color(event: &BytesStart) -> Result<FillMarker, ExtractError> {
    let auto = event.get_attribute_value("auto")?;
    if matches!(auto.as_deref(), Some("1") | Some("true")) {
        return Ok(FillMarker::Auto);
    }
    if let Some(index) = event.parse_attribute_value::<u32>("indexed")? {
        return Ok(FillMarker::Indexed(index));
    }
    if let Some(theme) = event.parse_attribute_value::<u32>("theme")? {
        return Ok(FillMarker::Theme(theme));
    }
    let fill = event
        .get_attribute_value("rgb")?
        .map(|rgb| FillMarker::Rgb(rgb.to_ascii_uppercase()))
        .unwrap_or_default();
    Ok(fill)
}
