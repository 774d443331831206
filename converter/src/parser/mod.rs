//! CSV project file reading with encoding auto-detection.
//!
//! The project file has no quoting: every `,` separates two fields.
//! This module only turns bytes into numbered lines and lines into fields;
//! column semantics live in [`header`] and [`crate::transform`].

pub mod header;

use std::path::Path;

use crate::error::{InputError, InputResult};
use crate::models::FIELD_DELIMITER;

pub use header::ColumnIndex;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decoded CSV project file
#[derive(Debug, Clone)]
pub struct CsvInput {
    /// Decoded text
    pub content: String,
    /// Detected encoding
    pub encoding: String,
}

/// One data line with its position in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLine<'a> {
    /// 1-based line number (the header is line 1)
    pub number: usize,
    pub text: &'a str,
}

impl DataLine<'_> {
    /// Entirely empty lines carry no row.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// A UTF-8 byte order mark is removed so it never sticks to the first
/// header name.
pub fn decode_content(bytes: &[u8], encoding: &str) -> InputResult<String> {
    let decoder = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => encoding_rs::UTF_8,
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::WINDOWS_1252,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252,
        other => encoding_rs::Encoding::for_label(other.as_bytes()).ok_or_else(|| {
            InputError::Encoding(format!("unsupported encoding '{}'", other))
        })?,
    };

    let (text, _, had_errors) = decoder.decode(bytes);
    if had_errors && decoder == encoding_rs::UTF_8 {
        // Mislabelled single-byte file: fall back to the usual spreadsheet export.
        let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
        return Ok(text.into_owned());
    }
    Ok(text.into_owned())
}

/// Read and decode a CSV project file.
///
/// Fails with [`InputError::NotFound`] before touching the file contents
/// when the path does not exist.
pub fn read_input<P: AsRef<Path>>(path: P) -> InputResult<CsvInput> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    decode_input(&bytes)
}

/// Decode CSV bytes with auto-detection of the encoding.
///
/// Valid UTF-8 is taken as is; chardet only runs on other input, since its
/// guess on short files with a few accented letters is unreliable.
pub fn decode_input(bytes: &[u8]) -> InputResult<CsvInput> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Ok(CsvInput {
            content: text.to_string(),
            encoding: "utf-8".to_string(),
        });
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    Ok(CsvInput { content, encoding })
}

/// Split decoded content into the header line and the numbered data lines.
///
/// Line terminators (`\n` or `\r\n`) are removed, as is a bare `\r` left at
/// the end of the last line. Returns `None` for empty content.
pub fn split_lines(content: &str) -> Option<(&str, Vec<DataLine<'_>>)> {
    let mut lines = content
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line));
    let header = lines.next()?;

    let data = lines
        .enumerate()
        .map(|(idx, text)| DataLine {
            number: idx + 2, // +1 for 0-index, +1 for header
            text,
        })
        .collect();

    Some((header, data))
}

/// Split one line into its raw fields.
///
/// Empty fields are preserved and no trimming happens; `"a,,b,"` gives
/// four fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_DELIMITER).collect()
}
