use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::{ReckonError, Result, RowIssue};
use crate::models::Expense;

pub struct LoadResult {
    pub expenses: Vec<Expense>,
    pub issues: Vec<RowIssue>,
}

/// Header positions of the canonical fields. Optional columns that are not in
/// the header load as empty strings.
struct ColumnMap {
    width: usize,
    date: usize,
    amount: usize,
    category: usize,
    property: usize,
    check_num: usize,
    source: Option<usize>,
    account: Option<usize>,
    notes: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let names: Vec<&str> = header.iter().map(str::trim).collect();
        let find = |name: &str| names.iter().position(|h| *h == name);
        let require =
            |name: &str| find(name).ok_or_else(|| ReckonError::MissingColumn(name.to_string()));

        Ok(Self {
            width: names.len(),
            date: require("Date")?,
            amount: require("Amount")?,
            category: require("Category")?,
            property: require("Property")?,
            check_num: require("CheckNum")?,
            source: find("Source"),
            account: find("Account"),
            notes: find("Notes"),
        })
    }

    fn bind(&self, record: &StringRecord, line: u64) -> std::result::Result<Expense, RowIssue> {
        let raw = || record.iter().map(String::from).collect::<Vec<_>>();
        if record.len() != self.width {
            return Err(RowIssue::Structural {
                line,
                expected: self.width,
                found: record.len(),
                raw: raw(),
            });
        }

        let field = |idx: usize| record[idx].to_string();
        let optional = |idx: Option<usize>| idx.map(field).unwrap_or_default();

        for (name, idx) in [
            ("Date", self.date),
            ("Amount", self.amount),
            ("Category", self.category),
        ] {
            if record[idx].trim().is_empty() {
                return Err(RowIssue::MissingField {
                    line,
                    field: name,
                    raw: raw(),
                });
            }
        }

        Ok(Expense {
            date: field(self.date),
            amount: field(self.amount),
            category: field(self.category),
            property: field(self.property),
            source: optional(self.source),
            account: optional(self.account),
            check_num: field(self.check_num),
            notes: optional(self.notes),
            line,
        })
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(str::is_empty)
}

pub fn load_expenses(file_path: &Path) -> Result<LoadResult> {
    let file = std::fs::File::open(file_path)?;
    let result = load_from_reader(std::io::BufReader::new(file))?;
    log::info!(
        "loaded {} expenses from {} ({} rows skipped)",
        result.expenses.len(),
        file_path.display(),
        result.issues.len()
    );
    Ok(result)
}

/// Read an expense report. Malformed rows are collected as issues and
/// skipped; only I/O failures and an unreadable or incomplete header abort
/// the load.
pub fn load_from_reader<R: Read>(reader: R) -> Result<LoadResult> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut columns: Option<ColumnMap> = None;
    let mut expenses = Vec::new();
    let mut issues = Vec::new();

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() || columns.is_none() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                issues.push(RowIssue::Structural {
                    line,
                    expected: columns.as_ref().map_or(0, |c| c.width),
                    found: 0,
                    raw: vec![e.to_string()],
                });
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line());

        let Some(map) = columns.as_ref() else {
            columns = Some(ColumnMap::from_header(&record)?);
            continue;
        };
        match map.bind(&record, line) {
            Ok(expense) => expenses.push(expense),
            Err(issue) => {
                log::debug!("skipping line {line}");
                issues.push(issue);
            }
        }
    }

    Ok(LoadResult { expenses, issues })
}
