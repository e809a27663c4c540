use crate::utils::error::{PrepError, Result};
use std::collections::HashSet;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PrepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PrepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        match Path::new(file).extension().and_then(|ext| ext.to_str()) {
            Some(extension) if allowed_set.contains(extension) => {}
            Some(extension) => {
                return Err(PrepError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(PrepError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PrepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// The value must name a file directly, with no directory components.
pub fn validate_bare_file_name(field_name: &str, value: &str) -> Result<()> {
    let file_name = Path::new(value).file_name().and_then(|name| name.to_str());
    if file_name != Some(value) || value.contains('\\') {
        return Err(PrepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Must be a file name without directory components".to_string(),
        });
    }
    Ok(())
}

pub fn validate_distinct_paths(field_name: &str, first: &str, second: &str) -> Result<()> {
    if Path::new(first) == Path::new(second) {
        return Err(PrepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: second.to_string(),
            reason: format!("Must differ from {}", first),
        });
    }
    Ok(())
}
