use crate::state::live::ConnectionState;
use crate::state::view::ViewState;
use chrono::Local;
use leaderboard_api::{LeaderboardPage, Pagination, Player};

// ---------------------------------------------------------------------------
// Loaded page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    Fetch,
    Live,
}

#[derive(Debug, Default)]
pub struct LeaderboardState {
    pub page: Option<LeaderboardPage>,
    /// Bumped on every replacement; the visible-row memo keys on it.
    pub revision: u64,
    pub updated_at: Option<String>,
    pub origin: Option<UpdateOrigin>,
}

impl LeaderboardState {
    pub fn replace(&mut self, page: LeaderboardPage, origin: UpdateOrigin) {
        self.page = Some(page);
        self.revision = self.revision.wrapping_add(1);
        self.updated_at = Some(Local::now().format("%H:%M:%S").to_string());
        self.origin = Some(origin);
    }

    pub fn players(&self) -> &[Player] {
        self.page.as_ref().map(|p| p.players.as_slice()).unwrap_or_default()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.page.as_ref().map(|p| &p.pagination)
    }

    pub fn is_loaded(&self) -> bool {
        self.page.is_some()
    }
}

// ---------------------------------------------------------------------------
// Live channel status
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LiveStatus {
    pub enabled: bool,
    pub state: ConnectionState,
    pub snapshots_applied: u64,
}

impl LiveStatus {
    pub fn label(&self) -> &'static str {
        if self.enabled { self.state.label() } else { "off" }
    }
}

// ---------------------------------------------------------------------------
// Request sequencing
// ---------------------------------------------------------------------------

/// Hands out request ids and remembers the newest one issued.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, request_id: u64) -> bool {
        request_id == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub view: ViewState,
    pub leaderboard: LeaderboardState,
    pub live: LiveStatus,
    pub requests: RequestTracker,
    pub source_label: String,
    pub last_error: Option<String>,
    pub detail_open: bool,
    pub show_help: bool,
    pub show_tiers: bool,
    pub show_logs: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(page_size: u32) -> Self {
        Self {
            view: ViewState::new(page_size),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard_api::mock::MockSource;

    #[test]
    fn replacing_the_page_bumps_the_revision() {
        let mut state = LeaderboardState::default();
        assert!(!state.is_loaded());
        assert!(state.players().is_empty());

        state.replace(MockSource::new().page(1, 10).unwrap(), UpdateOrigin::Fetch);
        state.replace(MockSource::new().page(1, 10).unwrap(), UpdateOrigin::Live);
        assert_eq!(state.revision, 2);
        assert_eq!(state.players().len(), 10);
        assert_eq!(state.origin, Some(UpdateOrigin::Live));
        assert!(state.updated_at.is_some());
    }

    #[test]
    fn only_the_newest_request_is_current() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn disabled_live_channel_reads_off() {
        let mut live = LiveStatus { state: ConnectionState::Open, ..LiveStatus::default() };
        assert_eq!(live.label(), "off");
        live.enabled = true;
        assert_eq!(live.label(), "on");
    }
}
