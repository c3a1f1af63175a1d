pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::{error_log::DEFAULT_ERROR_LOG, http::DEFAULT_API_URL};
#[cfg(feature = "cli")]
use crate::core::batcher::DEFAULT_BATCH_SIZE;
#[cfg(feature = "cli")]
use crate::core::paginator::DEFAULT_PAGE_SIZE;
#[cfg(feature = "cli")]
use crate::core::task_pool::DEFAULT_CONCURRENCY;
#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, LocationMatch, PartialPolicy};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::SettingsFile;

#[cfg(feature = "cli")]
#[derive(Clone, Parser)]
#[command(name = "group-prune")]
#[command(about = "Find group members by location and remove the ones you pick")]
pub struct CliConfig {
    #[arg(long, help = "Group ID")]
    pub group_id: String,

    #[arg(long, help = "Graph API access token")]
    pub access_token: String,

    #[arg(long, help = "Target location to filter members")]
    pub location: String,

    #[arg(long, help = "Graph API base URL [default: https://graph.facebook.com/v16.0]")]
    pub api_url: Option<String>,

    #[arg(long, help = "Members per listing page [default: 500]")]
    pub page_size: Option<usize>,

    #[arg(long, help = "IDs per metadata lookup [default: 50]")]
    pub batch_size: Option<usize>,

    #[arg(long, help = "Removals in flight at once [default: 5]")]
    pub concurrency: Option<usize>,

    #[arg(long, help = "Error log file [default: error_log.txt]")]
    pub error_log: Option<String>,

    #[arg(long, help = "HTTP request timeout in seconds")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Match location exactly instead of ignoring case")]
    pub case_sensitive: bool,

    #[arg(long, help = "Treat a failed listing page as no members at all")]
    pub discard_partial: bool,

    #[arg(long, help = "TOML settings file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("group_id", &self.group_id)
            .field("access_token", &"***")
            .field("location", &self.location)
            .field("api_url", &self.api_url())
            .field("page_size", &self.page_size())
            .field("batch_size", &self.batch_size())
            .field("concurrency", &self.concurrency())
            .field("error_log", &self.error_log_path())
            .field("timeout_secs", &self.timeout_secs)
            .field("case_sensitive", &self.case_sensitive)
            .field("discard_partial", &self.discard_partial)
            .finish()
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Fills every setting not given on the command line from `settings`.
    pub fn apply_settings(&mut self, settings: SettingsFile) {
        self.api_url = self.api_url.take().or(settings.api.url);
        self.timeout_secs = self.timeout_secs.or(settings.api.timeout_secs);
        self.page_size = self.page_size.or(settings.fetch.page_size);
        self.batch_size = self.batch_size.or(settings.fetch.batch_size);
        self.concurrency = self.concurrency.or(settings.removal.concurrency);
        self.error_log = self.error_log.take().or(settings.logging.error_log);
        self.case_sensitive |= settings.filter.case_sensitive.unwrap_or(false);
        self.discard_partial |= settings.fetch.discard_partial.unwrap_or(false);
    }

    /// 有 `--config` 時載入並合併設定檔
    pub fn load_settings_file(&mut self) -> Result<()> {
        if let Some(path) = self.config.clone() {
            let settings = SettingsFile::from_file(&path)?;
            settings.validate()?;
            tracing::debug!("Loaded settings from {}", path);
            self.apply_settings(settings);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs.map(std::time::Duration::from_secs)
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn group_id(&self) -> &str {
        &self.group_id
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }

    fn error_log_path(&self) -> &str {
        self.error_log.as_deref().unwrap_or(DEFAULT_ERROR_LOG)
    }

    fn location_match(&self) -> LocationMatch {
        if self.case_sensitive {
            LocationMatch::Exact
        } else {
            LocationMatch::CaseInsensitive
        }
    }

    fn partial_policy(&self) -> PartialPolicy {
        if self.discard_partial {
            PartialPolicy::Discard
        } else {
            PartialPolicy::KeepPartial
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("group_id", &self.group_id)?;
        validate_non_empty_string("access_token", &self.access_token)?;
        validate_non_empty_string("location", &self.location)?;
        validate_url("api_url", self.api_url())?;
        validate_range("page_size", self.page_size(), 1, 5000)?;
        validate_range("batch_size", self.batch_size(), 1, 50)?;
        validate_range("concurrency", self.concurrency(), 1, 100)?;
        validate_path("error_log", self.error_log_path())?;
        if let Some(timeout) = self.timeout_secs {
            validate_range("timeout_secs", timeout, 1, 600)?;
        }
        Ok(())
    }
}
