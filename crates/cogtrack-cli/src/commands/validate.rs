//! The `cogtrack validate` command.

use std::path::PathBuf;

use anyhow::Result;

use cogtrack_core::norms::NormTable;

pub fn execute(norms_path: PathBuf) -> Result<()> {
    let table = NormTable::load(&norms_path)?;

    println!(
        "Norm table: {} age band(s), thresholds high >= {} / medium >= {}",
        table.bands.len(),
        table.thresholds.high,
        table.thresholds.medium
    );

    let warnings = table.validate();
    for w in &warnings {
        let prefix = w
            .band
            .as_ref()
            .map(|b| format!("  [{b}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Norm table valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
