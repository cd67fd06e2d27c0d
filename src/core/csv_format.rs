use crate::core::ExportFormat;
use crate::domain::model::{CsvTable, OutputFormat};
use crate::utils::error::{ExportError, Result};
use csv::{ReaderBuilder, WriterBuilder};

/// Comma-delimited export: header order is preserved, unwanted columns are dropped.
pub struct CsvFormat;

impl ExportFormat for CsvFormat {
    type Raw = String;
    type Cleaned = CsvTable;

    const FORMAT: OutputFormat = OutputFormat::Csv;

    fn decode(body: String) -> Result<String> {
        Ok(body)
    }

    fn clean(raw: String, unwanted: &[String]) -> Result<CsvTable> {
        clean_csv(&raw, unwanted)
    }

    fn serialize(cleaned: &CsvTable) -> Result<Vec<u8>> {
        write_csv(cleaned)
    }

    fn record_count(cleaned: &CsvTable) -> usize {
        cleaned.len()
    }
}

pub fn clean_csv(raw: &str, unwanted: &[String]) -> Result<CsvTable> {
    // Short rows are tolerated and padded; wide rows are rejected below.
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());

    let input_header = reader
        .headers()
        .map_err(|e| ExportError::malformed("csv", e.to_string()))?
        .clone();

    if input_header.is_empty() {
        return Err(ExportError::malformed("csv", "no header row"));
    }

    let kept: Vec<usize> = input_header
        .iter()
        .enumerate()
        .filter(|(_, name)| !unwanted.iter().any(|u| u == name))
        .map(|(index, _)| index)
        .collect();

    let header = kept
        .iter()
        .map(|&index| input_header[index].to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ExportError::malformed("csv", e.to_string()))?;
        if record.len() > input_header.len() {
            return Err(ExportError::malformed(
                "csv",
                format!(
                    "data row {} has {} fields but the header has {}",
                    line + 1,
                    record.len(),
                    input_header.len()
                ),
            ));
        }

        rows.push(
            kept.iter()
                .map(|&index| record.get(index).unwrap_or_default().to_string())
                .collect(),
        );
    }

    tracing::debug!(
        "CSV cleaned: {} columns kept of {}, {} rows",
        kept.len(),
        input_header.len(),
        rows.len()
    );

    Ok(CsvTable { header, rows })
}

pub fn write_csv(table: &CsvTable) -> Result<Vec<u8>> {
    // The csv writer renders a zero-field record as `""`, which would invent a column.
    if table.header.is_empty() {
        return Ok(b"\n".repeat(table.rows.len() + 1));
    }

    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(&table.header)
        .map_err(|e| ExportError::malformed("csv", e.to_string()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| ExportError::malformed("csv", e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::malformed("csv", e.to_string()))
}
