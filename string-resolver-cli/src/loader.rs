use std::path::{Path, PathBuf};

use string_resolver::{EntryDocument, traits::Parser};

use crate::validation::validate_directory_path;

/// Lists the `*.json` files directly inside `dir`, sorted by file name.
pub fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>, String> {
    validate_directory_path(&dir.display().to_string())?;

    let pattern = format!("{}/*.json", glob::Pattern::escape(&dir.display().to_string()));
    let mut files = glob::glob(&pattern)
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Failed to list {}: {}", dir.display(), e))?;
    files.retain(|path| path.is_file());
    files.sort();
    Ok(files)
}

/// Reads every entry document in `dir`.
pub fn load_documents(dir: &Path) -> Result<Vec<EntryDocument>, String> {
    let files = json_files_in(dir)?;
    let documents = files
        .iter()
        .map(|file| {
            EntryDocument::read_from(file)
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        dir = %dir.display(),
        documents = documents.len(),
        "loaded entry documents"
    );
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_documents_sorted_and_filtered() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"{"title":"B","lang":"en","entries":[]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"title":"A","lang":"en","entries":[]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let documents = load_documents(dir.path()).unwrap();
        let titles: Vec<_> = documents.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_invalid_document_names_the_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        let err = load_documents(dir.path()).unwrap_err();
        assert!(err.contains("broken.json"));
    }

    #[test]
    fn test_missing_directory() {
        let err = load_documents(Path::new("/no/such/content")).unwrap_err();
        assert!(err.contains("does not exist"));
    }
}
