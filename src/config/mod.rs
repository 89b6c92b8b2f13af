pub mod roles;

use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use time::UtcOffset;
use url::Url;

const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub upstream_api_url: Url,
    pub upstream_timeout_seconds: u64,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub permission_cache_ttl_seconds: u64,
    pub display_utc_offset_minutes: i32,
    pub upload_max_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        let upstream_api_url = env_or_err("UPSTREAM_API_URL")?;
        let upstream_api_url = Url::parse(&upstream_api_url)
            .map_err(|err| anyhow!("invalid UPSTREAM_API_URL: {}", err))?;

        let page_size: u32 = env_or_parse("PAGE_SIZE", "20")?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(anyhow!(
                "invalid PAGE_SIZE: must be between 1 and {}",
                MAX_PAGE_SIZE
            ));
        }

        let display_utc_offset_minutes: i32 = env_or_parse("DISPLAY_UTC_OFFSET_MINUTES", "0")?;
        offset_from_minutes(display_utc_offset_minutes)
            .ok_or_else(|| anyhow!("invalid DISPLAY_UTC_OFFSET_MINUTES: out of range"))?;

        Ok(Self {
            http_addr,
            upstream_api_url,
            upstream_timeout_seconds: env_or_parse("UPSTREAM_TIMEOUT_SECONDS", "30")?,
            page_size,
            search_debounce_ms: env_or_parse("SEARCH_DEBOUNCE_MS", "500")?,
            permission_cache_ttl_seconds: env_or_parse("PERMISSION_CACHE_TTL_SECONDS", "60")?,
            display_utc_offset_minutes,
            upload_max_bytes: env_or_parse("UPLOAD_MAX_BYTES", "10485760")?,
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn permission_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.permission_cache_ttl_seconds)
    }

    pub fn display_offset(&self) -> UtcOffset {
        offset_from_minutes(self.display_utc_offset_minutes).unwrap_or(UtcOffset::UTC)
    }
}

fn offset_from_minutes(minutes: i32) -> Option<UtcOffset> {
    UtcOffset::from_whole_seconds(minutes.checked_mul(60)?).ok()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_err(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("missing required env var: {}", key))
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
