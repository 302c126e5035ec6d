use std::io::{Read, Write};
use std::path::Path;

use csv::StringRecord;

use crate::error::{ReckonError, Result};
use crate::models::CANONICAL_COLUMNS;

// ---------------------------------------------------------------------------
// Statement kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementKind {
    Chase,
}

const ALL_STATEMENTS: &[StatementKind] = &[StatementKind::Chase];

impl StatementKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Chase => "chase",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Chase => "Chase checking statement",
        }
    }

    /// Rewrite a statement export as an expense report. Returns how many
    /// rows were written and how many were left out.
    pub fn convert<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<ConvertResult> {
        match self {
            Self::Chase => convert_chase(reader, writer),
        }
    }
}

pub fn get_by_key(key: &str) -> Option<StatementKind> {
    ALL_STATEMENTS.iter().find(|s| s.key() == key).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertResult {
    pub written: usize,
    pub skipped: usize,
}

pub fn convert_file(
    file_path: &Path,
    output: Option<&Path>,
    format_key: &str,
) -> Result<ConvertResult> {
    let kind =
        get_by_key(format_key).ok_or_else(|| ReckonError::UnknownFormat(format_key.to_string()))?;
    let input = std::io::BufReader::new(std::fs::File::open(file_path)?);
    let result = match output {
        Some(path) => kind.convert(input, std::fs::File::create(path)?)?,
        None => kind.convert(input, std::io::stdout().lock())?,
    };
    log::info!(
        "converted {} from {}: {} rows written, {} skipped",
        file_path.display(),
        kind.name(),
        result.written,
        result.skipped
    );
    Ok(result)
}

fn column(header: &StringRecord, name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| ReckonError::MissingColumn(name.to_string()))
}

// ---------------------------------------------------------------------------
// Chase
// ---------------------------------------------------------------------------

fn convert_chase<R: Read, W: Write>(reader: R, writer: W) -> Result<ConvertResult> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header = rdr.headers()?.clone();
    let idx_type = column(&header, "Type")?;
    let idx_date = column(&header, "Post Date")?;
    let idx_desc = column(&header, "Description")?;
    let idx_amount = column(&header, "Amount")?;
    let idx_check = column(&header, "Check or Slip #")?;

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CANONICAL_COLUMNS)?;

    let mut result = ConvertResult {
        written: 0,
        skipped: 0,
    };
    for record in rdr.records() {
        let record = record?;
        let get = |idx: usize| record.get(idx).unwrap_or("");
        if get(idx_type) == "CREDIT" {
            result.skipped += 1;
            continue;
        }
        let raw_amount = get(idx_amount);
        let amount = raw_amount.strip_prefix('-').unwrap_or(raw_amount);
        wtr.write_record([
            get(idx_date),
            amount,
            "",
            "",
            "statement",
            "chase",
            get(idx_check),
            get(idx_desc),
        ])?;
        result.written += 1;
    }
    wtr.flush()?;
    Ok(result)
}
