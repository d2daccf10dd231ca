use crate::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_REGION: &str = "na1";
const DEFAULT_DDRAGON_VERSION: &str = "14.25.1";
const DEFAULT_ASSET_BATCH_WINDOW_MS: u64 = 25;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub region: String,
    pub ddragon_version: String,
    pub asset_batch_window: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("RIOT_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let region = env::var("RIOT_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());
        let ddragon_version =
            env::var("DDRAGON_VERSION").unwrap_or_else(|_| DEFAULT_DDRAGON_VERSION.to_string());

        let window_ms = match env::var("ASSET_BATCH_WINDOW_MS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::ConfigError(format!(
                    "ASSET_BATCH_WINDOW_MS must be a number of milliseconds, got '{}'",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_ASSET_BATCH_WINDOW_MS,
        };

        Ok(Config {
            api_key,
            region,
            ddragon_version,
            asset_batch_window: Duration::from_millis(window_ms),
        })
    }

    /// Commands that talk to the Riot web API need a key; local files don't.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::ConfigError("RIOT_API_KEY not found in environment or .env file".to_string())
        })
    }

    pub fn regional_routing(&self) -> &'static str {
        match self.region.as_str() {
            "na1" | "br1" | "la1" | "la2" => "americas",
            "euw1" | "eun1" | "tr1" | "ru" => "europe",
            "kr" | "jp1" => "asia",
            "oc1" | "ph2" | "sg2" | "th2" | "vn2" => "sea",
            _ => "americas",
        }
    }
}
