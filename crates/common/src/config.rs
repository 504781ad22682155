use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "ApiConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "ApiConfig::default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl ApiConfig {
    const fn default_timeout_secs() -> u64 {
        10
    }

    const fn default_request_delay_ms() -> u64 {
        100
    }
}

/// One login/code pair accepted by the ticketing API.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountsConfig {
    /// Manager accounts whose ticket lists are concatenated.
    pub managers: Vec<Account>,
    /// Analyst account used for the category list and detail fetches.
    pub analyst: Account,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "ReportConfig::default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "ReportConfig::default_trend_days")]
    pub trend_days: u32,
    #[serde(default = "ReportConfig::default_top_categories")]
    pub top_categories: usize,
    #[serde(default)]
    pub fetch_details: bool,
}

impl ReportConfig {
    fn default_output_dir() -> PathBuf {
        PathBuf::from("output")
    }

    const fn default_trend_days() -> u32 {
        30
    }

    const fn default_top_categories() -> usize {
        5
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
            trend_days: Self::default_trend_days(),
            top_categories: Self::default_top_categories(),
            fetch_details: false,
        }
    }
}
