use std::path::PathBuf;

use ascloc::fetch::localization_list;
use ascloc::traits::JsonFile;
use ascloc::{DuplicatePolicy, LocalizationKind, merge_spreadsheet};

/// Options for the offline merge command.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub kind: LocalizationKind,
    /// Saved localization listing to take identifiers from.
    pub server: PathBuf,
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub policy: DuplicatePolicy,
}

/// Run the merge command: join a spreadsheet against a saved snapshot and
/// write the merged batch, without contacting the API.
pub fn run_merge_command(opts: MergeOptions) -> Result<(), String> {
    let input = opts
        .input
        .unwrap_or_else(|| PathBuf::from(opts.kind.default_spreadsheet));
    if !input.is_file() {
        return Err(format!("file not found: {}", input.display()));
    }

    let snapshot = serde_json::Value::read_from(&opts.server)
        .map_err(|e| format!("Failed to read snapshot '{}': {}", opts.server.display(), e))?;
    let server = localization_list(&snapshot)
        .map_err(|e| format!("Invalid snapshot '{}': {}", opts.server.display(), e))?;

    let batch = merge_spreadsheet(&server, &input, &opts.kind, &opts.output, opts.policy)
        .map_err(|e| e.to_string())?;

    println!(
        "Merged {} row(s) from {}: {} matched, {} unmatched",
        batch.report.rows,
        input.display(),
        batch.report.matched,
        batch.report.unmatched.len()
    );
    for unmatched in &batch.report.unmatched {
        println!(
            "  row {}: no server localization for locale {}",
            unmatched.row + 1,
            unmatched.locale.as_deref().unwrap_or("<empty>")
        );
    }
    println!("✅ Merged batch written to: {}", opts.output.display());
    Ok(())
}
