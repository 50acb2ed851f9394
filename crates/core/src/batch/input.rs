//! Input collection
//!
//! Numbers are every contiguous digit run in the input; the input is read as
//! a file when a file of that name exists and treated as literal text
//! otherwise. Records are the `record` elements of a MARCXML document, read
//! from a file unless the input is itself markup.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use wcmeta_common::marcxml;
use wcmeta_domain::{BatchItem, BatchOperation, InputKind, Result, WcMetaError};

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("DIGIT_RUN should compile - this is a bug"));

/// Collect the items `operation` consumes from `input`.
///
/// # Errors
/// Returns `WcMetaError::InvalidInput` when no item is found or the MARCXML
/// is malformed, and `WcMetaError::Io` when an existing file cannot be read.
pub fn collect_items(operation: BatchOperation, input: &str) -> Result<Vec<BatchItem>> {
    match operation.input_kind() {
        InputKind::Numbers => collect_numbers(input),
        InputKind::Records => collect_records(&read_marcxml(input)?),
    }
}

/// Scan digit runs from a file, or from `input` itself when no such file
/// exists.
///
/// # Errors
/// Returns `WcMetaError::InvalidInput` when there are no digit runs.
pub fn collect_numbers(input: &str) -> Result<Vec<BatchItem>> {
    let text = read_file_or_literal(input)?;
    let numbers = scan_numbers(&text);
    if numbers.is_empty() {
        return Err(WcMetaError::InvalidInput("No record numbers found in input".to_string()));
    }
    debug!(count = numbers.len(), "collected record numbers");
    Ok(numbers.into_iter().map(BatchItem::Number).collect())
}

/// Records of a MARCXML document, each under its 035 $a or, lacking one,
/// its zero-based position.
///
/// # Errors
/// Returns `WcMetaError::InvalidInput` for malformed XML or a document with
/// no records.
pub fn collect_records(xml: &str) -> Result<Vec<BatchItem>> {
    let records =
        marcxml::extract_records(xml).map_err(|e| WcMetaError::InvalidInput(e.to_string()))?;
    if records.is_empty() {
        return Err(WcMetaError::InvalidInput("No records found in input".to_string()));
    }
    debug!(count = records.len(), "collected MARCXML records");

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| BatchItem::Record {
            id: record.control_id.unwrap_or_else(|| index.to_string()),
            xml: record.xml,
        })
        .collect())
}

/// Every contiguous digit run in `text`, in order.
#[must_use]
pub fn scan_numbers(text: &str) -> Vec<String> {
    DIGIT_RUN.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// A record input names a file; only inline markup is taken literally.
fn read_marcxml(input: &str) -> Result<String> {
    if input.trim_start().starts_with('<') {
        return Ok(input.to_string());
    }
    let path = Path::new(input);
    if !path.is_file() {
        return Err(WcMetaError::Io(format!("file not found: {}", path.display())));
    }
    read_file_or_literal(input)
}

fn read_file_or_literal(input: &str) -> Result<String> {
    let path = Path::new(input);
    if path.is_file() {
        return std::fs::read_to_string(path)
            .map_err(|e| WcMetaError::Io(format!("Failed to read {}: {e}", path.display())));
    }
    Ok(input.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const THREE_RECORDS: &str = r#"<collection xmlns="http://www.loc.gov/MARC21/slim">
  <record><datafield tag="035" ind1=" " ind2=" "><subfield code="a">(OCoLC)111</subfield></datafield></record>
  <record><datafield tag="245" ind1="0" ind2="0"><subfield code="a">Untitled</subfield></datafield></record>
  <record><datafield tag="035" ind1=" " ind2=" "><subfield code="a">(OCoLC)333</subfield></datafield></record>
</collection>"#;

    #[test]
    fn scans_literal_text_for_digit_runs() {
        assert_eq!(scan_numbers("12345 and 67890"), vec!["12345", "67890"]);
        assert_eq!(scan_numbers("ocm00123,ocn456;789x"), vec!["00123", "456", "789"]);
        assert!(scan_numbers("none here").is_empty());
    }

    #[test]
    fn reads_numbers_from_an_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "823520553\n  1234 # comment 99").unwrap();

        let items = collect_numbers(file.path().to_str().unwrap()).unwrap();
        assert_eq!(
            items,
            vec![
                BatchItem::Number("823520553".into()),
                BatchItem::Number("1234".into()),
                BatchItem::Number("99".into()),
            ]
        );
    }

    #[test]
    fn empty_input_is_fatal() {
        let err = collect_numbers("no digits").unwrap_err();
        assert_eq!(err, WcMetaError::InvalidInput("No record numbers found in input".into()));

        let empty = NamedTempFile::new().unwrap();
        assert!(collect_numbers(empty.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn record_without_035_falls_back_to_its_index() {
        let items = collect_records(THREE_RECORDS).unwrap();
        let ids: Vec<&str> = items.iter().map(BatchItem::correlation_id).collect();
        assert_eq!(ids, vec!["(OCoLC)111", "1", "(OCoLC)333"]);
    }

    #[test]
    fn record_commands_read_marcxml_files() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(THREE_RECORDS.as_bytes()).unwrap();

        let items = collect_items(BatchOperation::Create, file.path().to_str().unwrap()).unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn missing_record_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("recrods.xml");
        let missing = missing.to_str().unwrap();

        let err = collect_items(BatchOperation::Update, missing).unwrap_err();
        assert_eq!(err, WcMetaError::Io(format!("file not found: {missing}")));
    }

    #[test]
    fn inline_markup_is_accepted_for_record_commands() {
        let items = collect_items(BatchOperation::Validate, THREE_RECORDS).unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn byte_order_mark_is_not_part_of_any_record() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("\u{feff}<collection><record><leader>x</leader></record></collection>".as_bytes())
            .unwrap();

        let items = collect_items(BatchOperation::Create, file.path().to_str().unwrap()).unwrap();
        assert_eq!(
            items,
            vec![BatchItem::Record {
                id: "0".into(),
                xml: format!("<record xmlns=\"{}\"><leader>x</leader></record>", marcxml::MARC_NS),
            }]
        );
    }

    #[test]
    fn documents_without_records_are_fatal() {
        assert!(collect_records("<collection/>").is_err());
        assert!(collect_records("<collection><record></collection>").is_err());
    }
}
