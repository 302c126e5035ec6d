/// Canonical expense report header, in file order.
pub const CANONICAL_COLUMNS: [&str; 8] = [
    "Date", "Amount", "Category", "Property", "Source", "Account", "CheckNum", "Notes",
];

/// One admitted row of an expense report. Amounts stay as entered; they are
/// parsed into cents only when totals are computed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expense {
    pub date: String,
    pub amount: String,
    pub category: String,
    /// Blank means shared across all properties.
    pub property: String,
    pub source: String,
    pub account: String,
    pub check_num: String,
    pub notes: String,
    /// 1-based line in the source file. Diagnostics only.
    pub line: u64,
}

/// Fields two entries must share, verbatim, to count as the same expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateKey<'a> {
    pub date: &'a str,
    pub amount: &'a str,
    pub category: &'a str,
    pub check_num: &'a str,
}

impl Expense {
    pub fn duplicate_key(&self) -> DuplicateKey<'_> {
        DuplicateKey {
            date: &self.date,
            amount: &self.amount,
            category: &self.category,
            check_num: &self.check_num,
        }
    }

    pub fn is_general(&self) -> bool {
        self.property.trim().is_empty()
    }

    /// Field values in canonical column order.
    pub fn fields(&self) -> [&str; 8] {
        [
            &self.date,
            &self.amount,
            &self.category,
            &self.property,
            &self.source,
            &self.account,
            &self.check_num,
            &self.notes,
        ]
    }
}
