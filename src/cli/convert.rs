use std::path::PathBuf;

use crate::convert::convert_file;
use crate::error::Result;
use crate::settings::shellexpand_path;

pub fn run(file: &str, format: &str, output: Option<&str>) -> Result<()> {
    let output: Option<PathBuf> = output.map(shellexpand_path);
    let result = convert_file(&shellexpand_path(file), output.as_deref(), format)?;
    if let Some(path) = &output {
        println!(
            "Wrote {} expenses to {} ({} credits skipped)",
            result.written,
            path.display(),
            result.skipped
        );
    }
    Ok(())
}
