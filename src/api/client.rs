use crate::config::Config;
use crate::error::AppError;
use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use std::fs;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoints::*;
use super::models::*;

const USER_AGENT: &str = "match_insight/0.1.0";
const MAX_RETRIES: u32 = 3;
const REQUESTS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(20) {
    Some(n) => n,
    None => panic!("rate must be non-zero"),
};

pub struct RiotApiClient {
    config: Config,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RiotApiClient {
    pub fn new(config: Config) -> Self {
        let rate_limiter = RateLimiter::direct(Quota::per_second(REQUESTS_PER_SECOND));
        RiotApiClient {
            config,
            rate_limiter,
        }
    }

    fn wait_for_slot(&self) {
        while self.rate_limiter.check().is_err() {
            thread::sleep(Duration::from_millis(50));
        }
    }

    fn execute_request(&self, path: &str) -> Result<String, AppError> {
        let api_key = self.config.require_api_key()?;
        let url = format!("{}{}", regional_host(self.config.regional_routing()), path);

        let mut retry_count = 0;

        loop {
            self.wait_for_slot();
            debug!(path, "riot api request");

            let response = ureq::get(&url)
                .set("User-Agent", USER_AGENT)
                .set("X-Riot-Token", api_key)
                .call();

            match response {
                Ok(resp) => {
                    return resp.into_string().map_err(|e| AppError::HttpError(e.to_string()));
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_ms = 2000 * (retry_count + 1) as u64;
                    warn!(path, wait_ms, "rate limited by riot api, backing off");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(404, _)) => {
                    return Err(AppError::NotFound(path.to_string()));
                }
                Err(ureq::Error::Status(code, _)) => {
                    return Err(AppError::ApiError(format!("{} returned status {}", path, code)));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }

    pub fn get_account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError> {
        let path = format!("{}/{}/{}", ACCOUNT_BY_RIOT_ID, game_name, tag_line);

        let riot_id = format!("{}#{}", game_name, tag_line);

        let body = self
            .execute_request(&path)
            .map_err(|e| account_lookup_error(e, &riot_id))?;
        serde_json::from_str(&body).map_err(|_| AppError::PlayerNotFound(riot_id))
    }

    pub fn get_match_ids(&self, puuid: &str, start: usize, count: usize) -> Result<Vec<String>, AppError> {
        let path = format!(
            "{}/{}/ids?start={}&count={}",
            MATCH_IDS_BY_PUUID, puuid, start, count
        );

        let body = self.execute_request(&path)?;
        parse_json(&body)
    }

    pub fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let path = format!("{}/{}", MATCH_BY_ID, match_id);

        let body = self.execute_request(&path)?;
        parse_json(&body)
    }
}

/// Only a 404 means the Riot ID does not exist; throttling and transport
/// failures keep their own error.
fn account_lookup_error(err: AppError, riot_id: &str) -> AppError {
    match err {
        AppError::NotFound(_) => AppError::PlayerNotFound(riot_id.to_string()),
        other => other,
    }
}

/// Reads a JSON document from a local path or an http(s) URL.
pub fn load_document<T: DeserializeOwned>(source: &str) -> Result<T, AppError> {
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        debug!(source, "fetching document");
        ureq::get(source)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| AppError::HttpError(e.to_string()))?
            .into_string()
            .map_err(|e| AppError::HttpError(e.to_string()))?
    } else {
        fs::read_to_string(source)?
    };

    parse_json(&body)
}

pub fn get_live_snapshot(source: &str) -> Result<LiveSnapshotDto, AppError> {
    load_document(source)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, AppError> {
    serde_json::from_str(body).map_err(|e| AppError::JsonError(e.to_string()))
}
