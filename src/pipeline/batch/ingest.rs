//! Tabular input: encoding fallback and name-column inference.
//!
//! Decoding tries an explicit, ordered candidate list: the requested encoding,
//! then UTF-8 with BOM, then Windows-1252. There is no statistical detection,
//! so the same bytes always decode the same way.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use unicode_normalization::UnicodeNormalization;

use super::error::IngestError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Bytes with no character assigned in code page 1252. The WHATWG decoder
/// maps them to C1 controls; a strict cp1252 read rejects them.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Header labels recognized as the name column, in priority order.
pub const NAME_COLUMN_CANDIDATES: &[&str] = &[
    "name", "tên", "ten", "full_name", "fullname", "họ_tên", "ho_ten",
    "Name", "Tên", "Ten", "Full_Name", "FullName", "Họ_Tên", "Ho_Ten",
    "họ tên", "Họ tên", "Họ Tên", "họ và tên", "Họ và tên", "Họ và Tên",
    "NAME", "TÊN", "HỌ TÊN", "HỌ VÀ TÊN",
];

// ═══════════════════════════════════════════
// Encodings
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8.
    Utf8,
    /// UTF-8 with an optional byte-order mark.
    Utf8Sig,
    Windows1252,
    /// Any other WHATWG encoding label.
    Other(&'static Encoding),
}

impl TextEncoding {
    pub fn from_label(label: &str) -> Result<Self, IngestError> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(Self::Utf8Sig),
            "cp1252" | "windows-1252" => Ok(Self::Windows1252),
            other => Encoding::for_label(other.as_bytes())
                .map(|enc| {
                    if enc == UTF_8 {
                        Self::Utf8
                    } else if enc == WINDOWS_1252 {
                        Self::Windows1252
                    } else {
                        Self::Other(enc)
                    }
                })
                .ok_or_else(|| IngestError::UnknownEncoding(label.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Sig => "utf-8-sig",
            Self::Windows1252 => "windows-1252",
            Self::Other(enc) => enc.name(),
        }
    }

    /// Strict decode: `None` on any malformed sequence.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            Self::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            Self::Windows1252 => {
                if bytes.iter().any(|b| CP1252_UNDEFINED.contains(b)) {
                    return None;
                }
                WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
            }
            Self::Other(enc) => enc.decode_without_bom_handling_and_without_replacement(bytes),
        }
    }
}

/// Requested encoding first, then the fixed fallbacks, without repeats.
pub fn candidate_encodings(requested: TextEncoding) -> Vec<TextEncoding> {
    let mut candidates = vec![requested];
    for fallback in [TextEncoding::Utf8Sig, TextEncoding::Windows1252] {
        if !candidates.contains(&fallback) {
            candidates.push(fallback);
        }
    }
    candidates
}

/// Decode with the first candidate that accepts the bytes.
pub fn decode_with_fallback(
    bytes: &[u8],
    requested: TextEncoding,
    path: &Path,
) -> Result<(String, TextEncoding), IngestError> {
    let candidates = candidate_encodings(requested);
    for (attempt, encoding) in candidates.iter().enumerate() {
        match encoding.decode(bytes) {
            Some(text) => {
                if attempt > 0 {
                    tracing::info!(encoding = encoding.name(), "Input decoded with fallback encoding");
                }
                // A BOM in front of the header would hide the first column name
                let text: &str = &text;
                let text = text.strip_prefix('\u{feff}').unwrap_or(text).to_string();
                return Ok((text, *encoding));
            }
            None => {
                tracing::warn!(
                    encoding = encoding.name(),
                    path = %path.display(),
                    "Decode failed, trying next encoding"
                );
            }
        }
    }

    Err(IngestError::Undecodable {
        path: path.to_path_buf(),
        tried: candidates
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

// ═══════════════════════════════════════════
// Table
// ═══════════════════════════════════════════

/// Header plus string cells. Short rows are padded with empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn parse(text: &str) -> Result<Self, IngestError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(IngestError::NoColumns);
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the header equal to `name` after NFC normalization.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted: String = name.nfc().collect();
        self.headers
            .iter()
            .position(|h| h.nfc().collect::<String>() == wanted)
    }

    pub fn column_values(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect()
    }
}

// ═══════════════════════════════════════════
// Column resolution
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// Caller named the column and it exists.
    Hint,
    /// Matched one of [`NAME_COLUMN_CANDIDATES`].
    Inferred,
    /// Nothing matched; first column used.
    FirstColumn,
}

/// The name column chosen for a run. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub name: String,
    pub index: usize,
    pub source: ColumnSource,
}

pub fn resolve_column(table: &Table, hint: Option<&str>) -> Result<ColumnSelection, IngestError> {
    if let Some(hint) = hint {
        if let Some(index) = table.column_index(hint) {
            return Ok(ColumnSelection {
                name: table.headers[index].clone(),
                index,
                source: ColumnSource::Hint,
            });
        }
        tracing::warn!(column = hint, "Requested column not in header, inferring name column");
    }

    for candidate in NAME_COLUMN_CANDIDATES {
        if let Some(index) = table.column_index(candidate) {
            return Ok(ColumnSelection {
                name: table.headers[index].clone(),
                index,
                source: ColumnSource::Inferred,
            });
        }
    }

    let first = table.headers.first().ok_or(IngestError::NoColumns)?;
    Ok(ColumnSelection {
        name: first.clone(),
        index: 0,
        source: ColumnSource::FirstColumn,
    })
}

// ═══════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub column: ColumnSelection,
    pub encoding: TextEncoding,
}

impl LoadedTable {
    /// Values of the resolved name column, in row order.
    pub fn names(&self) -> Vec<String> {
        self.table.column_values(self.column.index)
    }
}

pub fn load_table(
    path: &Path,
    column_hint: Option<&str>,
    encoding_label: &str,
) -> Result<LoadedTable, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    let requested = TextEncoding::from_label(encoding_label)?;
    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode_with_fallback(&bytes, requested, path)?;

    let table = Table::parse(&text)?;
    let column = resolve_column(&table, column_hint)?;

    tracing::info!(
        rows = table.len(),
        path = %path.display(),
        encoding = encoding.name(),
        "Input table loaded"
    );
    tracing::info!(column = %column.name, source = ?column.source, "Using name column");

    Ok(LoadedTable {
        table,
        column,
        encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn loads_utf8_and_infers_name_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "in.csv", "id,name\n1,anh Hiếu\n2,chị Thương\n".as_bytes());

        let loaded = load_table(&path, None, "utf-8").unwrap();
        assert_eq!(loaded.table.len(), 2);
        assert_eq!(loaded.column.name, "name");
        assert_eq!(loaded.column.source, ColumnSource::Inferred);
        assert_eq!(loaded.encoding, TextEncoding::Utf8);
        assert_eq!(loaded.names(), vec!["anh Hiếu", "chị Thương"]);
    }

    #[test]
    fn windows_1252_falls_back_with_same_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let text = "name\nJosé Núñez\nFrançois\nRenée\n";
        let utf8_path = write(&dir, "utf8.csv", text.as_bytes());
        let (cp1252, _, unmappable) = WINDOWS_1252.encode(text);
        assert!(!unmappable);
        let cp_path = write(&dir, "cp1252.csv", &cp1252);

        let native = load_table(&utf8_path, None, "utf-8").unwrap();
        let fallback = load_table(&cp_path, None, "utf-8").unwrap();

        assert_eq!(fallback.encoding, TextEncoding::Windows1252);
        assert_eq!(fallback.table.len(), native.table.len());
        assert_eq!(fallback.names(), native.names());
    }

    #[test]
    fn bom_is_not_part_of_first_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Tên,tuổi\nHoa,20\n".as_bytes());
        let path = write(&dir, "bom.csv", &bytes);

        let loaded = load_table(&path, None, "utf-8").unwrap();
        assert_eq!(loaded.column.name, "Tên");
        assert_eq!(loaded.column.source, ColumnSource::Inferred);
    }

    #[test]
    fn hint_wins_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "in.csv", "name,Họ tên\nx,Trần Thị Hoa\n".as_bytes());
        let loaded = load_table(&path, Some("Họ tên"), "utf-8").unwrap();
        assert_eq!(loaded.column.source, ColumnSource::Hint);
        assert_eq!(loaded.names(), vec!["Trần Thị Hoa"]);
    }

    #[test]
    fn missing_hint_falls_back_to_inference() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "in.csv", "id,fullname\n1,Lê Lan\n".as_bytes());
        let loaded = load_table(&path, Some("nope"), "utf-8").unwrap();
        assert_eq!(loaded.column.name, "fullname");
    }

    #[test]
    fn unmatched_header_uses_first_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "in.csv", "person,age\nNam,30\n".as_bytes());
        let loaded = load_table(&path, None, "utf-8").unwrap();
        assert_eq!(loaded.column.name, "person");
        assert_eq!(loaded.column.source, ColumnSource::FirstColumn);
    }

    #[test]
    fn candidate_priority_follows_list_order() {
        let table = Table::parse("Name,ten,name\na,b,c\n").unwrap();
        let column = resolve_column(&table, None).unwrap();
        assert_eq!(column.name, "name");
        assert_eq!(column.index, 2);
    }

    #[test]
    fn decomposed_header_still_matches() {
        let table = Table::parse("Te\u{0302}n\nHoa\n").unwrap();
        let column = resolve_column(&table, None).unwrap();
        assert_eq!(column.source, ColumnSource::Inferred);
    }

    #[test]
    fn short_rows_padded_with_empty_cells() {
        let table = Table::parse("a,name\n1\n2,Hoa\n").unwrap();
        assert_eq!(table.column_values(1), vec!["", "Hoa"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(&dir.path().join("nope.csv"), None, "utf-8").unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn unknown_encoding_label_is_an_error() {
        assert!(matches!(
            TextEncoding::from_label("klingon-8"),
            Err(IngestError::UnknownEncoding(_))
        ));
        assert_eq!(TextEncoding::from_label("CP1252").unwrap(), TextEncoding::Windows1252);
        assert_eq!(TextEncoding::from_label("utf_8_sig").unwrap(), TextEncoding::Utf8Sig);
    }

    #[test]
    fn fallback_chain_has_no_repeats() {
        assert_eq!(
            candidate_encodings(TextEncoding::Utf8),
            vec![TextEncoding::Utf8, TextEncoding::Utf8Sig, TextEncoding::Windows1252]
        );
        assert_eq!(
            candidate_encodings(TextEncoding::Windows1252),
            vec![TextEncoding::Windows1252, TextEncoding::Utf8Sig]
        );
    }

    #[test]
    fn empty_file_has_no_columns() {
        assert!(matches!(Table::parse(""), Err(IngestError::NoColumns)));
    }

    #[test]
    fn undefined_cp1252_bytes_are_rejected() {
        for byte in CP1252_UNDEFINED {
            assert!(TextEncoding::Windows1252.decode(&[b'a', byte]).is_none());
        }
        assert!(TextEncoding::Windows1252.decode(b"Ren\xe9e").is_some());
    }

    #[test]
    fn undecodable_when_every_candidate_fails() {
        let bytes = b"name\n\x81\x8d\x8f\x90\x9d\x00\xff\n";
        let err = decode_with_fallback(bytes, TextEncoding::Utf8, Path::new("binary.csv")).unwrap_err();
        match err {
            IngestError::Undecodable { path, tried } => {
                assert_eq!(path, Path::new("binary.csv"));
                assert_eq!(tried, "utf-8, utf-8-sig, windows-1252");
            }
            other => panic!("expected Undecodable, got {other:?}"),
        }
    }

    #[test]
    fn load_reports_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "in.csv", b"name\n\x90\xff\n");
        assert!(matches!(
            load_table(&path, None, "utf-8"),
            Err(IngestError::Undecodable { .. })
        ));
    }
}
