use crate::config::{ConvertSettings, EnrichSettings};
use crate::utils::error::{PrepError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional `dict-prep.toml`. Every key may be omitted; missing keys fall
/// back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrepConfig {
    pub convert: Option<ConvertSection>,
    pub enrich: Option<EnrichSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertSection {
    pub input: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichSection {
    pub dir: Option<String>,
    pub reference_file: Option<String>,
    pub tracked_fields: Option<Vec<String>>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub verbose: Option<bool>,
}

impl PrepConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PrepError::InputNotFound {
                path: path.display().to_string(),
            },
            _ => PrepError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PrepError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DICT_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PrepError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn convert_settings(&self) -> ConvertSettings {
        let mut settings = ConvertSettings::default();
        if let Some(section) = &self.convert {
            if let Some(input) = &section.input {
                settings.input = input.clone();
            }
            if let Some(output) = &section.output {
                settings.output = output.clone();
            }
        }
        settings
    }

    pub fn enrich_settings(&self) -> EnrichSettings {
        let mut settings = EnrichSettings::default();
        if let Some(section) = &self.enrich {
            if let Some(dir) = &section.dir {
                settings.dir = dir.clone();
            }
            if let Some(reference_file) = &section.reference_file {
                settings.reference_file = reference_file.clone();
            }
            if let Some(fields) = &section.tracked_fields {
                settings.tracked_fields = fields.clone();
            }
            if let Some(dry_run) = section.dry_run {
                settings.dry_run = dry_run;
            }
        }
        settings
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}
