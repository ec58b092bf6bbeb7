//! I/O utilities for reading the input CSV and writing generated artifacts.
//!
//! All file I/O in the importer flows through this module:
//!
//! - **Delimiter resolution**: extension-based detection (`.tsv` → tab,
//!   anything else → comma) with manual override support.
//! - **Encoding**: strict input decoding via `encoding_rs`, defaulting to UTF-8.
//!   Undecodable bytes are reported as errors rather than replaced.
//! - **Reader construction**: a flexible CSV reader so short rows reach row
//!   validation instead of aborting the run.
//! - **Artifact writing**: buffered output files that are flushed before the
//!   writer is dropped.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_input_file(path: &Path) -> std::io::Result<BufReader<File>> {
    File::open(path).map(BufReader::new)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_record(&headers, encoding)
}

/// Re-serializes decoded fields as a single delimited line, quoting only where
/// the delimiter, quotes or line breaks require it.
pub fn render_raw_row(fields: &[String], delimiter: u8) -> String {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .double_quote(true);
    let mut writer = builder.from_writer(Vec::new());
    if writer.write_record(fields).is_err() {
        return fields.join(&(delimiter as char).to_string());
    }
    match writer.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes)
            .trim_end_matches('\n')
            .to_string(),
        Err(_) => fields.join(&(delimiter as char).to_string()),
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("Creating output directory {path:?}"))
}

/// Writes `contents` to `path` through a buffered writer and flushes it.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .with_context(|| format!("Writing output file {path:?}"))?;
    writer
        .flush()
        .with_context(|| format!("Flushing output file {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn delimiter_follows_extension_unless_provided() {
        assert_eq!(
            resolve_input_delimiter(&PathBuf::from("data.tsv"), None),
            b'\t'
        );
        assert_eq!(
            resolve_input_delimiter(&PathBuf::from("data.CSV"), None),
            b','
        );
        assert_eq!(
            resolve_input_delimiter(&PathBuf::from("data.tsv"), Some(b';')),
            b';'
        );
    }

    #[test]
    fn unknown_encoding_label_is_rejected() {
        assert!(resolve_encoding(Some("not-an-encoding")).is_err());
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(
            resolve_encoding(Some(" latin1 ")).unwrap().name(),
            "windows-1252"
        );
    }

    #[test]
    fn raw_row_quotes_only_when_needed() {
        let fields = vec![
            "1".to_string(),
            "Calle 5, Piso 2".to_string(),
            "O'Hara".to_string(),
        ];
        assert_eq!(render_raw_row(&fields, b','), "1,\"Calle 5, Piso 2\",O'Hara");
    }

    #[test]
    fn strict_decoding_rejects_invalid_utf8() {
        assert!(decode_bytes(&[0x66, 0xff, 0x6f], UTF_8).is_err());
        assert_eq!(decode_bytes("añejo".as_bytes(), UTF_8).unwrap(), "añejo");
    }
}
