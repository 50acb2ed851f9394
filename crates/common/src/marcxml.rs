//! MARCXML helpers
//!
//! Records are located with a streaming reader and sliced out of the source
//! text unchanged, so what is sent upstream is byte-for-byte what the user
//! supplied (plus a namespace declaration when the record had none).

use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use thiserror::Error;

/// MARC 21 slim namespace
pub const MARC_NS: &str = "http://www.loc.gov/MARC21/slim";

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("DIGIT_RUN should compile - this is a bug"));

/// MARCXML parse failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Malformed MARCXML at byte {position}: {message}")]
pub struct MarcXmlError {
    pub position: usize,
    pub message: String,
}

/// A `record` element sliced out of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarcRecord {
    /// First 035 $a, when the record has one
    pub control_id: Option<String>,
    /// The element's markup with a namespace declaration
    pub xml: String,
}

#[derive(Debug)]
struct RecordScan {
    start: usize,
    depth: usize,
    insert_at: usize,
    namespace_decl: Option<String>,
    control_id: Option<String>,
    in_035: bool,
    in_subfield_a: bool,
}

impl RecordScan {
    fn new(start: usize, element: &BytesStart<'_>) -> Self {
        let qname_len = element.name().as_ref().len();
        Self {
            start,
            depth: 0,
            insert_at: 1 + qname_len,
            namespace_decl: missing_namespace_decl(element),
            control_id: None,
            in_035: false,
            in_subfield_a: false,
        }
    }

    fn open(&mut self, element: &BytesStart<'_>) {
        match element.local_name().as_ref() {
            b"datafield" => self.in_035 = attribute(element, "tag").as_deref() == Some("035"),
            b"subfield" => {
                self.in_subfield_a =
                    self.in_035 && attribute(element, "code").as_deref() == Some("a");
            }
            _ => {}
        }
    }

    fn close(&mut self, local_name: &[u8]) {
        match local_name {
            b"datafield" => self.in_035 = false,
            b"subfield" => self.in_subfield_a = false,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_subfield_a && self.control_id.is_none() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                self.control_id = Some(trimmed.to_string());
            }
        }
    }

    fn finish(self, source: &str, end: usize) -> MarcRecord {
        let mut xml = source[self.start..end].to_string();
        if let Some(decl) = self.namespace_decl {
            xml.insert_str(self.insert_at, &decl);
        }
        MarcRecord { control_id: self.control_id, xml }
    }
}

/// Every `record` element in `xml`, in document order.
///
/// Records nested inside wrappers (`collection`, Atom `entry`/`content`)
/// are found at any depth.
///
/// # Errors
/// Returns [`MarcXmlError`] when the document is not well formed.
pub fn extract_records(xml: &str) -> Result<Vec<MarcRecord>, MarcXmlError> {
    // Reader offsets do not count a leading byte order mark.
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();
    let mut current: Option<RecordScan> = None;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| MarcXmlError {
            position: reader.buffer_position() as usize,
            message: e.to_string(),
        })?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(element) => match current.as_mut() {
                Some(scan) => {
                    scan.depth += 1;
                    scan.open(&element);
                }
                None if element.local_name().as_ref() == b"record" => {
                    current = Some(RecordScan::new(before, &element));
                }
                None => {}
            },
            Event::Empty(element) => {
                if current.is_none() && element.local_name().as_ref() == b"record" {
                    records.push(RecordScan::new(before, &element).finish(xml, after));
                }
            }
            Event::Text(text) => {
                if let Some(scan) = current.as_mut() {
                    if let Ok(value) = text.unescape() {
                        scan.text(&value);
                    }
                }
            }
            Event::CData(cdata) => {
                if let Some(scan) = current.as_mut() {
                    scan.text(&String::from_utf8_lossy(&cdata));
                }
            }
            Event::End(element) => {
                if let Some(mut scan) = current.take() {
                    if scan.depth == 0 {
                        records.push(scan.finish(xml, after));
                    } else {
                        scan.depth -= 1;
                        scan.close(element.local_name().as_ref());
                        current = Some(scan);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if current.is_some() {
        return Err(MarcXmlError {
            position: xml.len(),
            message: "unterminated record element".to_string(),
        });
    }

    Ok(records)
}

/// First record in a response body, if any.
#[must_use]
pub fn first_record(xml: &str) -> Option<String> {
    extract_records(xml).ok()?.into_iter().next().map(|record| record.xml)
}

/// Text of the first Atom `id` element.
#[must_use]
pub fn atom_id(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut in_id = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => in_id = element.local_name().as_ref() == b"id",
            Ok(Event::Text(text)) if in_id => {
                let value = text.unescape().ok()?;
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
            Ok(Event::End(_)) => in_id = false,
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// OCLC number of a created or updated record: the first digit run of the
/// Atom `id` (`http://worldcat.org/oclc/<number>`).
#[must_use]
pub fn oclc_number(xml: &str) -> Option<String> {
    let id = atom_id(xml)?;
    DIGIT_RUN.find(&id).map(|m| m.as_str().to_string())
}

/// Wrap records in a single MARC `collection` document.
#[must_use]
pub fn collection_document(records: &[String]) -> String {
    let mut doc = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    doc.push_str(&format!("<collection xmlns=\"{MARC_NS}\">\n"));
    for record in records {
        doc.push_str(record.trim());
        doc.push('\n');
    }
    doc.push_str("</collection>\n");
    doc
}

/// Declaration to add when the record element does not bind its own prefix
/// (or the default namespace, when unprefixed).
fn missing_namespace_decl(element: &BytesStart<'_>) -> Option<String> {
    let name = element.name();
    let wanted = match name.prefix() {
        Some(prefix) => [b"xmlns:".as_slice(), prefix.as_ref()].concat(),
        None => b"xmlns".to_vec(),
    };
    let declares = element
        .attributes()
        .filter_map(Result::ok)
        .any(|attr| attr.key.as_ref() == wanted.as_slice());
    if declares {
        return None;
    }

    Some(format!(" {}=\"{MARC_NS}\"", String::from_utf8_lossy(&wanted)))
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Option<String> {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(|value| value.into_owned()))
}
