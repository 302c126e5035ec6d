use crate::duplicates::find_duplicates;
use crate::error::Result;
use crate::loader::load_expenses;
use crate::settings::shellexpand_path;

use super::report::{duplicates_section, print_sections, report_issues};

pub fn run(file: &str) -> Result<()> {
    let loaded = load_expenses(&shellexpand_path(file))?;
    let clusters = find_duplicates(&loaded.expenses);
    print_sections(&[duplicates_section(&clusters)]);
    report_issues(loaded.issues);
    Ok(())
}
