use crate::state::view::{DEFAULT_PAGE_SIZE, PAGE_SIZES};
use leaderboard_api::client::DEFAULT_API_URL;
use log::{LevelFilter, warn};
use std::time::Duration;

pub const DEFAULT_LIVE_URL: &str = "ws://localhost:8000/ws";
const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api_url: String,
    /// `None` when live updates are switched off.
    pub live_url: Option<String>,
    pub page_size: u32,
    /// `None` disables the periodic reload.
    pub refresh_every: Option<Duration>,
    pub use_mock: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let api_url = var("DUELBOARD_API_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let live_url = match var("DUELBOARD_LIVE_WS") {
            None => Some(DEFAULT_LIVE_URL.to_string()),
            Some(v) if v.is_empty() || v.eq_ignore_ascii_case("off") => None,
            // The websocket client is built without TLS.
            Some(v) if v.get(..6).is_some_and(|scheme| scheme.eq_ignore_ascii_case("wss://")) => {
                warn!("secure live URL {v} is not supported, live updates are off");
                None
            }
            Some(v) => Some(v),
        };

        let page_size = var("DUELBOARD_PAGE_SIZE")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|size| PAGE_SIZES.contains(size))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let refresh_secs = var("DUELBOARD_REFRESH_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REFRESH_SECS);

        let log_level = var("DUELBOARD_LOG").and_then(|v| v.parse::<LevelFilter>().ok());

        Self {
            full_screen: false,
            log_level,
            api_url,
            live_url,
            page_size,
            refresh_every: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
            use_mock: false,
        }
    }
}
