use std::collections::BTreeMap;

use crate::duplicates::find_duplicates;
use crate::error::RowIssue;
use crate::fmt::MoneyFormat;
use crate::models::Expense;

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Expenses keyed by property. A property appears only if some expense names
/// it; expenses with a blank property go to `general` instead.
pub struct PropertyGroups<'a> {
    pub by_property: BTreeMap<&'a str, Vec<&'a Expense>>,
    pub general: Vec<&'a Expense>,
}

pub fn group_by_property(expenses: &[Expense]) -> PropertyGroups<'_> {
    let mut by_property: BTreeMap<&str, Vec<&Expense>> = BTreeMap::new();
    let mut general = Vec::new();
    for e in expenses {
        if e.is_general() {
            general.push(e);
        } else {
            by_property.entry(e.property.as_str()).or_default().push(e);
        }
    }
    PropertyGroups {
        by_property,
        general,
    }
}

// ---------------------------------------------------------------------------
// Category totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    /// Cents per category. Only categories with a contributing expense.
    pub totals: BTreeMap<String, i64>,
    pub grand_total: i64,
    /// Expenses left out because their amount did not parse or would
    /// overflow a total.
    pub issues: Vec<RowIssue>,
}

pub fn aggregate_by_category<'a, I>(expenses: I, money: &MoneyFormat) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut result = CategoryTotals::default();
    for e in expenses {
        let Ok(cents) = money.parse(&e.amount) else {
            result.issues.push(RowIssue::InvalidAmount {
                line: e.line,
                amount: e.amount.clone(),
            });
            continue;
        };
        let category_total = result.totals.get(&e.category).copied().unwrap_or(0);
        match (
            category_total.checked_add(cents),
            result.grand_total.checked_add(cents),
        ) {
            (Some(category_total), Some(grand_total)) => {
                result.totals.insert(e.category.clone(), category_total);
                result.grand_total = grand_total;
            }
            _ => result.issues.push(RowIssue::AmountOverflow {
                line: e.line,
                amount: e.amount.clone(),
            }),
        }
    }
    result
}

/// Each property's share of `cents` when divided `split_factor` ways. `None`
/// when no split applies. The share may carry a fraction of a cent.
pub fn split_share(cents: i64, split_factor: u32) -> Option<f64> {
    (split_factor > 0).then(|| cents as f64 / f64::from(split_factor))
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitFactor {
    #[default]
    None,
    Fixed(u32),
    /// One share per named property in the batch.
    PropertyCount,
}

impl SplitFactor {
    pub fn resolve(self, property_count: usize) -> u32 {
        match self {
            Self::None => 0,
            Self::Fixed(n) => n,
            Self::PropertyCount => u32::try_from(property_count).unwrap_or(u32::MAX),
        }
    }
}

pub struct GroupSummary<'a> {
    pub name: String,
    pub expenses: Vec<&'a Expense>,
    pub totals: CategoryTotals,
}

pub struct Reconciliation<'a> {
    /// Sorted by property name.
    pub properties: Vec<GroupSummary<'a>>,
    /// Present only when some expense has no property.
    pub general: Option<GroupSummary<'a>>,
    pub split_factor: u32,
    pub duplicates: Vec<Vec<&'a Expense>>,
    pub issues: Vec<RowIssue>,
}

pub fn reconcile<'a>(
    expenses: &'a [Expense],
    money: &MoneyFormat,
    split: SplitFactor,
    general_label: &str,
) -> Reconciliation<'a> {
    let groups = group_by_property(expenses);
    let split_factor = split.resolve(groups.by_property.len());

    let summarize = |name: &str, members: Vec<&'a Expense>| {
        let totals = aggregate_by_category(members.iter().copied(), money);
        GroupSummary {
            name: name.to_string(),
            expenses: members,
            totals,
        }
    };

    let properties: Vec<_> = groups
        .by_property
        .into_iter()
        .map(|(name, members)| summarize(name, members))
        .collect();
    let general = (!groups.general.is_empty()).then(|| summarize(general_label, groups.general));

    let issues = properties
        .iter()
        .chain(general.iter())
        .flat_map(|g| g.totals.issues.iter().cloned())
        .collect();

    log::debug!(
        "reconciled {} expenses across {} properties (split factor {split_factor})",
        expenses.len(),
        properties.len()
    );

    Reconciliation {
        properties,
        general,
        split_factor,
        duplicates: find_duplicates(expenses),
        issues,
    }
}
