use std::path::{Path, PathBuf};

use string_resolver::{EntryMerger, Platform};

use crate::config::Config;
use crate::loader::load_documents;
use crate::validation::{ValidationContext, validate_context, validate_output_path};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub config: String,
    pub platform: Option<Platform>,
    pub version: Option<String>,
    pub output_dir: Option<String>,
    pub accessors: Option<String>,
}

/// Run the build command: merge the configured content and write one
/// localized table per culture.
pub fn run_build_command(opts: BuildOptions) -> Result<(), String> {
    let config = Config::read_from(Path::new(&opts.config))?;
    let output_dir = opts
        .output_dir
        .map(PathBuf::from)
        .or_else(|| config.output.strings.clone());
    let accessors_path = opts
        .accessors
        .map(PathBuf::from)
        .or_else(|| config.output.code.clone());

    let mut context = ValidationContext::new()
        .with_config_file(opts.config.clone())
        .with_content_dir(config.content.path.display().to_string());
    for output in output_dir.iter().chain(accessors_path.iter()) {
        context = context.with_output_path(output.display().to_string());
    }
    for culture in &config.cultures {
        context = context.with_culture(culture.clone());
    }
    validate_context(&context)?;

    let platform = opts.platform.or(config.platform).ok_or_else(|| {
        "iOS or Android format must be specified with --ios or --android".to_string()
    })?;
    let version = opts
        .version
        .clone()
        .or_else(|| config.version.clone())
        .ok_or_else(|| "App version must be specified with --version=x.y.z".to_string())?;
    let base_culture = config
        .base_culture()
        .ok_or_else(|| "Config must list at least one culture".to_string())?
        .to_string();

    let documents = load_documents(&config.content.path)?;
    let source_id = config.content.path.display().to_string();
    let mut merger =
        EntryMerger::new(platform, &version, Some(source_id)).map_err(|e| e.to_string())?;
    merger.add_entries(&documents).map_err(|e| e.to_string())?;

    let tables = merger
        .localize(config.cultures.as_slice(), &base_culture)
        .map_err(|e| e.to_string())?;

    match output_dir {
        Some(dir) => {
            for table in &tables {
                let path = dir.join(format!("{}.json", table.file_stem()));
                write_json(&path, table)?;
            }
            println!(
                "Wrote {} tables ({} keys) to {}",
                tables.len(),
                merger.len(),
                dir.display()
            );
        }
        None => {
            let rendered = serde_json::to_string_pretty(&tables)
                .map_err(|e| format!("Failed to serialize tables: {}", e))?;
            println!("{}", rendered);
        }
    }

    if let Some(path) = accessors_path {
        let accessors = merger.accessors(&base_culture).map_err(|e| e.to_string())?;
        write_json(&path, &accessors)?;
        tracing::info!(path = %path.display(), count = accessors.len(), "wrote accessors");
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), String> {
    validate_output_path(&path.display().to_string())?;
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize {}: {}", path.display(), e))?;
    std::fs::write(path, rendered).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
