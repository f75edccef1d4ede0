//! Event-level reading of package parts: workbook, worksheets, styles,
//! relationships, drawings and control properties all go through [`XmlReader`].

use crate::error::ExtractError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),

    #[error("Parse attribute value '{0}' failed")]
    ParseAttributeValueError(String),
}

/// Buffered event reader over one part.
///
/// Empty elements arrive as a start/end pair so `<c r="A1"/>` and
/// `<c r="A1"></c>` take the same path through the readers.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Next event, or `None` at the end of the part.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, ExtractError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(ExtractError::XmlError(error)),
        }
    }
}

/// Attribute lookups on a start tag.
pub(crate) trait XmlNodeHelper<'a> {
    /// Unescaped value of the attribute with this qualified name (`numFmtId`, `r:id`).
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ExtractError>;

    /// Unescaped value of the first attribute with this local name, whatever
    /// its prefix: `id` matches `r:id` under any namespace binding.
    fn get_local_attribute_value(&'a self, local_name: &str) -> Result<Option<Cow<'a, str>>, ExtractError>;

    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, ExtractError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ExtractError> {
        self.try_get_attribute(name)?.map(unescape).transpose()
    }

    fn get_local_attribute_value(&'a self, local_name: &str) -> Result<Option<Cow<'a, str>>, ExtractError> {
        for result in self.attributes() {
            let attribute = result?;
            if attribute.key.local_name().as_ref() == local_name.as_bytes() {
                return unescape(attribute).map(Some);
            }
        }
        Ok(None)
    }

    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, ExtractError> {
        match self.get_attribute_value(name)? {
            Some(value) => {
                let parsed = value.trim().parse::<T>();
                match parsed {
                    Ok(parsed) => Ok(Some(parsed)),
                    Err(_) => Err(XmlError::ParseAttributeValueError(value.into_owned()))?,
                }
            }
            None => Ok(None),
        }
    }
}

fn unescape(attribute: Attribute<'_>) -> Result<Cow<'_, str>, ExtractError> {
    Ok(attribute.unescape_value()?)
}

/// Accumulates the character data of an element, one event at a time.
pub(crate) trait XmlTextContextHelper {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), ExtractError>;

    /// Appends a `&name;` entity or a `&#n;`/`&#xh;` character reference.
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), ExtractError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), ExtractError> {
        self.push_str(&text.xml_content()?);
        Ok(())
    }

    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), ExtractError> {
        let raw = bytes.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = match number.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16)?,
                None => number.parse::<u32>()?,
            };
            // Invalid code points are dropped
            if let Some(character) = char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::ParseEntityError(raw.to_string()))?;
        }
        Ok(())
    }
}

/// Drives an [`XmlReader`] to the end of its part, dispatching each event to
/// the given match arms. Unmatched events are ignored; an arm may `break`.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}
