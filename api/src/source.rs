use crate::LeaderboardPage;
use crate::client::ApiResult;
use std::future::Future;

/// Anything that can serve one page of the leaderboard.
///
/// The viewer's network worker is generic over this, so the same UI runs
/// against the HTTP backend or the in-memory mock.
pub trait LeaderboardSource: Send + Sync + 'static {
    fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = ApiResult<LeaderboardPage>> + Send;

    /// Short name shown in the status bar.
    fn describe(&self) -> String;
}
