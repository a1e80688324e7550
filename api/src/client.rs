use crate::source::LeaderboardSource;
use crate::wire::{LegacyPage, WirePage};
use crate::{LeaderboardPage, Pagination};
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the leaderboard backend.
#[derive(Debug, Clone)]
pub struct LeaderboardApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    InvalidRequest(String),
    /// Both the primary and the legacy endpoint failed.
    Fallback {
        primary: Box<ApiError>,
        legacy: Box<ApiError>,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            ApiError::Fallback { primary, legacy } => write!(
                f,
                "Could not load leaderboard. Primary endpoint: {primary}. Legacy endpoint: {legacy}"
            ),
        }
    }
}

impl std::error::Error for ApiError {}

impl LeaderboardApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .user_agent("duelboard/0.1 (terminal leaderboard viewer)")
                .build()
                .unwrap_or_default(),
            base_url,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of players.
    ///
    /// Fallback chain:
    /// 1) `/api/leaderboard?page=&pageSize=`, paginated body.
    /// 2) `/leaderboard/{page}`, player list only; pagination synthesized here.
    pub async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<LeaderboardPage> {
        if page == 0 || page_size == 0 {
            return Err(ApiError::InvalidRequest(format!(
                "page and page size must be positive (page={page}, page_size={page_size})"
            )));
        }

        let primary = match self.fetch_primary_page(page, page_size).await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };
        warn!("primary leaderboard endpoint failed, trying legacy: {primary}");

        self.fetch_legacy_page(page, page_size)
            .await
            .map_err(|legacy| ApiError::Fallback {
                primary: Box::new(primary),
                legacy: Box::new(legacy),
            })
    }

    pub async fn fetch_primary_page(&self, page: u32, page_size: u32) -> ApiResult<LeaderboardPage> {
        let url = format!(
            "{}/api/leaderboard?page={page}&pageSize={page_size}",
            self.base_url
        );
        let raw: WirePage = self.get(&url).await?;
        Ok(raw.into_page())
    }

    /// The legacy endpoint carries no pagination metadata. The descriptor is
    /// built from the returned page alone, so `total` is the page-local count.
    pub async fn fetch_legacy_page(&self, page: u32, page_size: u32) -> ApiResult<LeaderboardPage> {
        let url = format!("{}/leaderboard/{page}", self.base_url);
        let raw: LegacyPage = self.get(&url).await?;
        let players = raw.into_players();
        let pagination = Pagination::new(players.len() as u64, page, page_size);
        Ok(LeaderboardPage { players, pagination })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

impl LeaderboardSource for LeaderboardApi {
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<LeaderboardPage> {
        LeaderboardApi::fetch_page(self, page, page_size).await
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
