pub mod convert;
pub mod duplicates;
pub mod report;

use clap::{Parser, Subcommand};

use crate::reconciler::SplitFactor;

#[derive(Parser)]
#[command(
    name = "reckon",
    about = "Reconcile rental-property expense reports by property and category."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Total expenses by property and category, and list likely duplicates.
    Report {
        /// Path to CSV expense report
        file: String,
        /// Divide shared (General) expenses this many ways
        #[arg(long, conflicts_with = "split_properties")]
        split: Option<u32>,
        /// Divide shared expenses by the number of properties in the report
        #[arg(long = "split-properties")]
        split_properties: bool,
        /// Also list every expense under its group
        #[arg(short, long)]
        verbose: bool,
        /// Leave out the duplicates section
        #[arg(long = "no-duplicates")]
        no_duplicates: bool,
    },
    /// List expenses that look like accidental re-entries.
    Duplicates {
        /// Path to CSV expense report
        file: String,
    },
    /// Convert a bank statement export into an expense report.
    Convert {
        /// Path to CSV statement
        file: String,
        /// Statement format key (e.g. chase)
        #[arg(long, default_value = "chase")]
        format: String,
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

pub(crate) fn split_factor(split: Option<u32>, split_properties: bool) -> SplitFactor {
    match (split, split_properties) {
        (Some(n), _) => SplitFactor::Fixed(n),
        (None, true) => SplitFactor::PropertyCount,
        (None, false) => SplitFactor::None,
    }
}
