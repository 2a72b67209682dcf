use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub transform: TransformConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub retries: u32,
    pub retry_delay_secs: f64,
    pub page_limit: u32,
    pub page_pause_secs: f64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            base_url: "https://fashion-studio.dicoding.dev".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36"
                .to_string(),
            timeout_secs: 10,
            retries: 3,
            retry_delay_secs: 3.0,
            page_limit: 50,
            page_pause_secs: 1.5,
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        seconds(self.retry_delay_secs)
    }

    pub fn page_pause(&self) -> Duration {
        seconds(self.page_pause_secs)
    }
}

// Negative or non-finite settings mean "no wait".
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Multiplier applied to the scraped USD price.
    pub exchange_rate: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig { exchange_rate: 16000.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub csv_path: String,
    pub sqlite_enabled: bool,
    pub sqlite_path: String,
    pub sqlite_table: String,
    /// Google Sheets export is skipped when unset.
    pub spreadsheet_id: Option<String>,
    pub sheet_range: String,
    pub sheets_access_token: String,
    pub sheets_api_url: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig {
            csv_path: "fashion_data.csv".to_string(),
            sqlite_enabled: true,
            sqlite_path: "fashion.sqlite".to_string(),
            sqlite_table: "fashion_products".to_string(),
            spreadsheet_id: None,
            sheet_range: "Sheet1!A1".to_string(),
            sheets_access_token: String::new(),
            sheets_api_url: "https://sheets.googleapis.com".to_string(),
        }
    }
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::new("Settings.toml", FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<AppConfig>()
}
