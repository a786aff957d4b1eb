//! File-backed uploads and table decoding (CSV and Excel workbooks).
//!
//! Every cell is read as text; typing happens later in the schema validator
//! so decoding never rejects a quantity cell.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use calamine::{Reader, Xlsx};
use orderdesk_core::error::IngestError;
use orderdesk_core::table::RawTable;
use orderdesk_core::upload::{TableDecoder, TableSource, Upload};
use polars::prelude::*;

/// Reads an upload from a local file.
pub struct FileTableSource {
    path: PathBuf,
    name: String,
}

impl FileTableSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TableSource for FileTableSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Upload, IngestError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| IngestError::ReadFailed {
                name: self.name.clone(),
                reason: e.to_string(),
            })?;
        tracing::info!(file = %self.name, bytes = bytes.len(), "Upload read");
        Ok(Upload::new(self.name.clone(), bytes))
    }
}

/// Comma-separated text with a header row.
#[derive(Debug, Clone, Copy)]
pub struct CsvDecoder {
    separator: u8,
}

impl CsvDecoder {
    pub fn new() -> Self {
        Self { separator: b',' }
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDecoder for CsvDecoder {
    fn decode(&self, upload: &Upload) -> Result<RawTable, IngestError> {
        if upload.bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(IngestError::EmptyUpload(upload.name.clone()));
        }

        let decode_err = |e: PolarsError| IngestError::DecodeFailed {
            name: upload.name.clone(),
            reason: e.to_string(),
        };

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_separator(self.separator))
            .into_reader_with_file_handle(Cursor::new(upload.bytes.clone()))
            .finish()
            .map_err(decode_err)?;

        let headers: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = vec![Vec::with_capacity(headers.len()); frame.height()];
        for column in frame.get_columns() {
            let cells = column.as_materialized_series().str().map_err(decode_err)?;
            for (row, cell) in rows.iter_mut().zip(cells.into_iter()) {
                row.push(cell.unwrap_or_default().to_string());
            }
        }

        tracing::debug!(
            upload = %upload.id().short(),
            columns = headers.len(),
            rows = rows.len(),
            "Decoded CSV upload"
        );
        Ok(RawTable::new(headers, rows))
    }
}

/// First worksheet of an `.xlsx` workbook; the first row is the header.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxDecoder;

impl XlsxDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl TableDecoder for XlsxDecoder {
    fn decode(&self, upload: &Upload) -> Result<RawTable, IngestError> {
        if upload.bytes.is_empty() {
            return Err(IngestError::EmptyUpload(upload.name.clone()));
        }

        let decode_err = |reason: String| IngestError::DecodeFailed {
            name: upload.name.clone(),
            reason,
        };

        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(upload.bytes.as_slice())).map_err(|e| decode_err(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| decode_err("workbook has no sheets".into()))?
            .map_err(|e| decode_err(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let headers: Vec<String> = match sheet_rows.next() {
            Some(cells) => cells.iter().map(|cell| cell.to_string()).collect(),
            None => return Err(IngestError::EmptyUpload(upload.name.clone())),
        };
        let rows: Vec<Vec<String>> = sheet_rows
            .map(|cells| cells.iter().map(|cell| cell.to_string()).collect())
            .collect();

        tracing::debug!(
            upload = %upload.id().short(),
            columns = headers.len(),
            rows = rows.len(),
            "Decoded workbook upload"
        );
        Ok(RawTable::new(headers, rows))
    }
}

/// Decoder for a file, by extension: `.xlsx`/`.xlsm` are workbooks, anything
/// else is read as CSV.
pub fn decoder_for(path: &Path) -> Box<dyn TableDecoder> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xlsx" | "xlsm") => Box::new(XlsxDecoder::new()),
        _ => Box::new(CsvDecoder::new()),
    }
}
