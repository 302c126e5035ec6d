use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::{Result, RowIssue};
use crate::fmt::MoneyFormat;
use crate::loader::load_expenses;
use crate::models::{Expense, CANONICAL_COLUMNS};
use crate::reconciler::{reconcile, split_share, GroupSummary, Reconciliation, SplitFactor};
use crate::settings::{load_settings, shellexpand_path};

pub struct ReportOptions {
    pub split: SplitFactor,
    pub verbose: bool,
    pub duplicates: bool,
}

/// A titled block of report output. Titles are styled only when printed.
pub struct Section {
    pub title: String,
    pub body: String,
}

pub fn run(file: &str, options: &ReportOptions) -> Result<()> {
    let settings = load_settings();
    let money = settings.money_format();
    let loaded = load_expenses(&shellexpand_path(file))?;
    let rec = reconcile(
        &loaded.expenses,
        &money,
        options.split,
        &settings.general_label,
    );

    let mut issues = loaded.issues;
    issues.extend(rec.issues.iter().cloned());
    report_issues(issues);

    print_sections(&render(&rec, &money, options));
    Ok(())
}

pub(crate) fn report_issues(mut issues: Vec<RowIssue>) {
    if issues.is_empty() {
        return;
    }
    issues.sort_by_key(RowIssue::line);
    for issue in &issues {
        log::warn!("{issue}");
    }
    let summary = format!("{} row(s) skipped; see messages above.", issues.len());
    eprintln!("{}", summary.as_str().yellow());
}

pub(crate) fn print_sections(sections: &[Section]) {
    for section in sections {
        println!("\n{}\n{}", section.title.as_str().bold(), section.body);
    }
}

pub fn render(rec: &Reconciliation, money: &MoneyFormat, options: &ReportOptions) -> Vec<Section> {
    let mut sections = Vec::new();
    for group in &rec.properties {
        sections.push(Section {
            title: format!("Property: {}", group.name),
            body: group_body(group, money, 0, options.verbose),
        });
    }
    if let Some(general) = &rec.general {
        sections.push(Section {
            title: general.name.clone(),
            body: group_body(general, money, rec.split_factor, options.verbose),
        });
    }
    if options.duplicates {
        sections.push(duplicates_section(&rec.duplicates));
    }
    sections
}

fn group_body(group: &GroupSummary, money: &MoneyFormat, split_factor: u32, verbose: bool) -> String {
    let mut body = totals_table(group, money, split_factor).to_string();
    if verbose {
        body.push('\n');
        body.push_str(&expenses_table(&group.expenses).to_string());
    }
    body
}

fn totals_table(group: &GroupSummary, money: &MoneyFormat, split_factor: u32) -> Table {
    let split = |cents: i64| split_share(cents, split_factor).map(|s| money.format_share(s));

    let mut table = Table::new();
    let mut header = vec!["Category".to_string(), "Amount".to_string()];
    if split_factor > 0 {
        header.push(format!("Split (÷{split_factor})"));
    }
    table.set_header(header);

    for (category, total) in &group.totals.totals {
        let mut row = vec![Cell::new(category), Cell::new(money.format(*total))];
        row.extend(split(*total).map(Cell::new));
        table.add_row(row);
    }
    let mut row = vec![
        Cell::new("Total"),
        Cell::new(money.format(group.totals.grand_total)),
    ];
    row.extend(split(group.totals.grand_total).map(Cell::new));
    table.add_row(row);
    table
}

fn expenses_table(expenses: &[&Expense]) -> Table {
    let mut table = Table::new();
    let mut header = vec!["Line"];
    header.extend(CANONICAL_COLUMNS);
    table.set_header(header);
    for e in expenses {
        let mut row = vec![Cell::new(e.line)];
        row.extend(e.fields().into_iter().map(Cell::new));
        table.add_row(row);
    }
    table
}

pub(crate) fn describe(e: &Expense) -> String {
    format!("line {}: {}", e.line, e.fields().join(", "))
}

pub(crate) fn duplicates_section(clusters: &[Vec<&Expense>]) -> Section {
    let body = if clusters.is_empty() {
        "No duplicates found.".to_string()
    } else {
        clusters
            .iter()
            .map(|cluster| {
                cluster
                    .iter()
                    .map(|e| describe(e))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    Section {
        title: "Possible duplicates".to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_from_reader;

    const REPORT: &str = "\
Date,Amount,Category,Property,Source,Account,CheckNum,Notes
1/1/2024,10.00,Repairs,Oak Ave,receipt,visa,,faucet
1/2/2024,5.00,Repairs,Oak Ave,receipt,visa,,washer
1/3/2024,1.00,Supplies,Oak Ave,receipt,visa,,
1/4/2024,40.00,Lawn,Elm St,receipt,visa,,
1/5/2024,\"1,000.00\",Insurance,,statement,chase,2001,
1/5/2024,\"1,000.00\",Insurance,,statement,chase,2001,
1/6/2024,3.00,Fees,,statement,chase,,
";

    fn options(split: SplitFactor) -> ReportOptions {
        ReportOptions {
            split,
            verbose: false,
            duplicates: true,
        }
    }

    fn sections_for(split: SplitFactor) -> Vec<Section> {
        let loaded = load_from_reader(REPORT.as_bytes()).unwrap();
        let money = MoneyFormat::default();
        let rec = reconcile(&loaded.expenses, &money, split, "General");
        render(&rec, &money, &options(split))
    }

    #[test]
    fn test_sections_in_order_with_general_last() {
        let titles: Vec<_> = sections_for(SplitFactor::None)
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(
            titles,
            [
                "Property: Elm St",
                "Property: Oak Ave",
                "General",
                "Possible duplicates"
            ]
        );
    }

    #[test]
    fn test_property_section_shows_totals() {
        let sections = sections_for(SplitFactor::None);
        let oak = &sections[1].body;
        assert!(oak.contains("Repairs"));
        assert!(oak.contains("$15.00"));
        assert!(oak.contains("Supplies"));
        assert!(oak.contains("$16.00"));
        assert!(!oak.contains("Split"));
    }

    #[test]
    fn test_general_section_shows_split_column() {
        let sections = sections_for(SplitFactor::PropertyCount);
        let general = &sections[2].body;
        assert!(general.contains("Split (÷2)"));
        assert!(general.contains("$2,000.00"));
        assert!(general.contains("$1,000.00"));
        assert!(general.contains("$2,003.00"));
        assert!(general.contains("$1,001.50"));
        assert!(!sections[0].body.contains("Split"));
    }

    #[test]
    fn test_uneven_split_shows_sub_cent_digits() {
        let sections = sections_for(SplitFactor::Fixed(3));
        let general = &sections[2].body;
        assert!(general.contains("Split (÷3)"));
        assert!(general.contains("$666.6667"));
        assert!(general.contains("$1.00"));
        assert!(general.contains("$667.6667"));
    }

    #[test]
    fn test_duplicates_section_lists_cluster() {
        let sections = sections_for(SplitFactor::None);
        let dupes = &sections[3].body;
        assert_eq!(
            dupes,
            "line 6: 1/5/2024, 1,000.00, Insurance, , statement, chase, 2001, \n\
             line 7: 1/5/2024, 1,000.00, Insurance, , statement, chase, 2001, "
        );
    }

    #[test]
    fn test_duplicate_clusters_separated_by_blank_line() {
        let a = Expense {
            line: 1,
            ..Default::default()
        };
        let b = Expense {
            line: 2,
            ..Default::default()
        };
        let section = duplicates_section(&[vec![&a, &a], vec![&b, &b]]);
        assert_eq!(section.body.matches("\n\n").count(), 1);
    }

    #[test]
    fn test_no_duplicates_message() {
        assert_eq!(duplicates_section(&[]).body, "No duplicates found.");
    }

    #[test]
    fn test_verbose_lists_expenses() {
        let loaded = load_from_reader(REPORT.as_bytes()).unwrap();
        let money = MoneyFormat::default();
        let rec = reconcile(&loaded.expenses, &money, SplitFactor::None, "General");
        let opts = ReportOptions {
            split: SplitFactor::None,
            verbose: true,
            duplicates: false,
        };
        let sections = render(&rec, &money, &opts);
        assert_eq!(sections.len(), 3);
        assert!(sections[1].body.contains("faucet"));
        assert!(sections[1].body.contains("washer"));
        assert!(sections[1].body.contains("CheckNum"));
    }

    #[test]
    fn test_empty_report_has_only_duplicates_section() {
        let rec = reconcile(&[], &MoneyFormat::default(), SplitFactor::None, "General");
        let sections = render(&rec, &MoneyFormat::default(), &options(SplitFactor::None));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, "No duplicates found.");
    }
}
