use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use leaderboard_api::LeaderboardPage;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadPage {
        request_id: u64,
        page: u32,
        page_size: u32,
    },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    PageLoaded { request_id: u64, page: LeaderboardPage },
    Error { request_id: u64, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Reload whatever page is on screen.
    RefreshTick,
}
