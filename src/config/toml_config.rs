use crate::utils::error::{PruneError, Result};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// 選填設定檔；命令列參數優先
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub api: ApiSettings,
    pub fetch: FetchSettings,
    pub filter: FilterSettings,
    pub removal: RemovalSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub page_size: Option<usize>,
    pub batch_size: Option<usize>,
    pub discard_partial: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub case_sensitive: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalSettings {
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub error_log: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl SettingsFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PruneError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| PruneError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GRAPH_API_URL})；未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for SettingsFile {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api.url {
            validate_url("api.url", url)?;
        }
        if let Some(timeout) = self.api.timeout_secs {
            validate_range("api.timeout_secs", timeout, 1, 600)?;
        }
        if let Some(page_size) = self.fetch.page_size {
            validate_positive_number("fetch.page_size", page_size, 1)?;
        }
        if let Some(batch_size) = self.fetch.batch_size {
            validate_range("fetch.batch_size", batch_size, 1, 50)?;
        }
        if let Some(concurrency) = self.removal.concurrency {
            validate_range("removal.concurrency", concurrency, 1, 100)?;
        }
        if let Some(error_log) = &self.logging.error_log {
            validate_path("logging.error_log", error_log)?;
        }
        Ok(())
    }
}
