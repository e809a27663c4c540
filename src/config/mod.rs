#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::PrepConfig;

use crate::domain::model::default_tracked_fields;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_bare_file_name, validate_distinct_paths, validate_file_extensions,
    validate_non_empty_string, validate_path, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONVERT_INPUT: &str = "coca20000.json";
pub const DEFAULT_CONVERT_OUTPUT: &str = "coca20000.jsonl";
pub const DEFAULT_REFERENCE_FILE: &str = "KEYBR.officialwordlibraries.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertSettings {
    pub input: String,
    pub output: String,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            input: DEFAULT_CONVERT_INPUT.to_string(),
            output: DEFAULT_CONVERT_OUTPUT.to_string(),
        }
    }
}

impl Validate for ConvertSettings {
    fn validate(&self) -> Result<()> {
        validate_path("convert.input", &self.input)?;
        validate_path("convert.output", &self.output)?;
        validate_distinct_paths("convert.output", &self.input, &self.output)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichSettings {
    /// Directory scanned for `*.json` files.
    pub dir: String,
    /// File name of the reference dataset inside `dir`.
    pub reference_file: String,
    pub tracked_fields: Vec<String>,
    pub dry_run: bool,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            reference_file: DEFAULT_REFERENCE_FILE.to_string(),
            tracked_fields: default_tracked_fields(),
            dry_run: false,
        }
    }
}

impl Validate for EnrichSettings {
    fn validate(&self) -> Result<()> {
        validate_path("enrich.dir", &self.dir)?;
        validate_path("enrich.reference_file", &self.reference_file)?;
        validate_bare_file_name("enrich.reference_file", &self.reference_file)?;
        validate_file_extensions(
            "enrich.reference_file",
            std::slice::from_ref(&self.reference_file),
            &["json"],
        )?;

        if self.tracked_fields.is_empty() {
            return Err(crate::utils::error::PrepError::MissingConfigError {
                field: "enrich.tracked_fields".to_string(),
            });
        }
        for field in &self.tracked_fields {
            validate_non_empty_string("enrich.tracked_fields", field)?;
        }

        Ok(())
    }
}
