mod cli;
mod convert;
mod duplicates;
mod error;
mod fmt;
mod loader;
mod models;
mod reconciler;
mod settings;

use clap::Parser;

use cli::report::ReportOptions;
use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report {
            file,
            split,
            split_properties,
            verbose,
            no_duplicates,
        } => cli::report::run(
            &file,
            &ReportOptions {
                split: cli::split_factor(split, split_properties),
                verbose,
                duplicates: !no_duplicates,
            },
        ),
        Commands::Duplicates { file } => cli::duplicates::run(&file),
        Commands::Convert {
            file,
            format,
            output,
        } => cli::convert::run(&file, &format, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
