use std::path::Path;

use string_resolver::{ChangeComputer, Platform, change_detail};

use crate::loader::load_documents;
use crate::validation::validate_output_path;

#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub before: String,
    pub after: String,
    pub platform: Platform,
    pub version: String,
    pub output: Option<String>,
}

fn print_or_write(output: Option<&String>, content: &str) -> Result<(), String> {
    if let Some(path) = output {
        validate_output_path(path)?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        println!("Diff written: {}", path);
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Run the diff command: print the strings whose resolved value changed
/// between two content directories for one platform and version.
pub fn run_diff_command(opts: DiffOptions) -> Result<(), String> {
    let computer = ChangeComputer::new(opts.platform, &opts.version).map_err(|e| e.to_string())?;

    let before = load_documents(Path::new(&opts.before))?;
    let after = load_documents(Path::new(&opts.after))?;

    let detail = change_detail(&before, &after);
    tracing::info!(changed_keys = detail.len(), "raw changes detected");
    let changes = computer.compute(&detail).map_err(|e| e.to_string())?;

    let rendered = serde_json::to_string_pretty(&changes)
        .map_err(|e| format!("Failed to serialize diff JSON: {}", e))?;
    print_or_write(opts.output.as_ref(), &rendered)
}
