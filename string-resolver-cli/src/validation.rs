use std::path::Path;
use unic_langid::LanguageIdentifier;

/// Validation context for the build command
#[derive(Debug, Default)]
pub struct ValidationContext {
    pub config_file: Option<String>,
    pub content_dirs: Vec<String>,
    pub output_paths: Vec<String>,
    pub cultures: Vec<String>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_file(mut self, file: String) -> Self {
        self.config_file = Some(file);
        self
    }

    pub fn with_content_dir(mut self, dir: String) -> Self {
        self.content_dirs.push(dir);
        self
    }

    pub fn with_output_path(mut self, path: String) -> Self {
        self.output_paths.push(path);
        self
    }

    pub fn with_culture(mut self, culture: String) -> Self {
        self.cultures.push(culture);
        self
    }
}

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate a content directory exists
pub fn validate_directory_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("Directory does not exist: {}", path));
    }

    if !path_obj.is_dir() {
        return Err(format!("Path is not a directory: {}", path));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        return Err(format!("Cannot create output directory: {}", e));
    }

    Ok(())
}

/// Validate language code format using unic-langid (same as lib crate)
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Validate a complete validation context
pub fn validate_context(context: &ValidationContext) -> Result<(), String> {
    if let Some(ref config) = context.config_file {
        validate_file_path(config).map_err(|e| format!("Config validation failed: {}", e))?;
    }

    for dir in &context.content_dirs {
        validate_directory_path(dir)
            .map_err(|e| format!("Content directory validation failed: {}", e))?;
    }

    for output in &context.output_paths {
        validate_output_path(output).map_err(|e| format!("Output validation failed: {}", e))?;
    }

    if context.cultures.is_empty() && context.config_file.is_some() {
        return Err(
            "Must specify target cultures for the strings file in the config file".to_string(),
        );
    }
    for culture in &context.cultures {
        validate_language_code(culture)
            .map_err(|e| format!("Culture validation failed: {}", e))?;
    }

    Ok(())
}
