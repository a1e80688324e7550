use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, UpdateOrigin};
use crate::state::live::ConnectionState;
use crate::state::messages::NetworkRequest;
use crate::state::view::SortField;
use leaderboard_api::{LeaderboardPage, Player};
use log::{debug, info, warn};

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let mut state = AppState::new(settings.page_size);
        state.live.enabled = settings.live_url.is_some();

        let app = Self { state, settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Outbound requests
    // -----------------------------------------------------------------------

    /// Build a load request for the page on screen. Any response to an
    /// earlier request is stale from here on.
    pub fn request_current_page(&mut self) -> NetworkRequest {
        NetworkRequest::LoadPage {
            request_id: self.state.requests.issue(),
            page: self.state.view.page,
            page_size: self.state.view.page_size,
        }
    }

    pub fn retry(&mut self) -> NetworkRequest {
        self.state.last_error = None;
        self.request_current_page()
    }

    // -----------------------------------------------------------------------
    // Network and live handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Returns false when the response was stale and dropped.
    pub fn on_page_loaded(&mut self, request_id: u64, page: LeaderboardPage) -> bool {
        if !self.state.requests.is_current(request_id) {
            debug!(
                "dropping stale page response {request_id} (latest {})",
                self.state.requests.latest()
            );
            return false;
        }
        self.state.last_error = None;
        self.apply_page(page, UpdateOrigin::Fetch);
        true
    }

    pub fn on_fetch_error(&mut self, request_id: u64, message: String) -> bool {
        if !self.state.requests.is_current(request_id) {
            debug!("dropping stale error for request {request_id}: {message}");
            return false;
        }
        self.state.last_error = Some(message);
        true
    }

    pub fn on_live_state(&mut self, state: ConnectionState) {
        if state != self.state.live.state {
            info!("live channel {}", state.label());
        }
        self.state.live.state = state;
    }

    /// Snapshots for any other page or page size are ignored.
    pub fn on_live_snapshot(&mut self, page: LeaderboardPage) -> bool {
        let view = &self.state.view;
        let p = &page.pagination;
        if p.page != view.page || p.page_size != view.page_size {
            debug!(
                "ignoring live snapshot for page {} size {} (showing page {} size {})",
                p.page, p.page_size, view.page, view.page_size
            );
            return false;
        }
        self.state.live.snapshots_applied += 1;
        self.state.last_error = None;
        self.apply_page(page, UpdateOrigin::Live);
        true
    }

    fn apply_page(&mut self, page: LeaderboardPage, origin: UpdateOrigin) {
        if page.players.is_empty() && page.pagination.total > 0 {
            warn!(
                "page {} came back empty out of {} players",
                page.pagination.page, page.pagination.total
            );
        }
        self.state.leaderboard.replace(page, origin);
        let len = self.visible_len();
        self.state.view.clamp_selection(len);
    }

    // -----------------------------------------------------------------------
    // Pagination
    // -----------------------------------------------------------------------

    /// Page count at the page size on screen. Right after a page-size change
    /// the loaded pagination still describes the old size, so the count is
    /// recomputed from its total.
    pub fn total_pages(&self) -> Option<u32> {
        let page_size = self.state.view.page_size;
        self.state
            .leaderboard
            .pagination()
            .map(|p| {
                if p.page_size == page_size {
                    p.total_pages
                } else {
                    leaderboard_api::total_pages(p.total, page_size)
                }
            })
            .filter(|pages| *pages > 0)
    }

    /// Move to `page`, clamped to the known page range. Returns the request
    /// to send when the page actually changed.
    pub fn go_to_page(&mut self, page: u32) -> Option<NetworkRequest> {
        let page = match self.total_pages() {
            Some(last) => page.clamp(1, last),
            None => page.max(1),
        };
        if !self.state.view.set_page(page) {
            return None;
        }
        self.state.detail_open = false;
        Some(self.request_current_page())
    }

    pub fn next_page(&mut self) -> Option<NetworkRequest> {
        let last = self.total_pages()?;
        if self.state.view.page >= last {
            return None;
        }
        self.go_to_page(self.state.view.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<NetworkRequest> {
        self.go_to_page(self.state.view.page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> Option<NetworkRequest> {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> Option<NetworkRequest> {
        let last = self.total_pages()?;
        self.go_to_page(last)
    }

    pub fn cycle_page_size(&mut self) -> Option<NetworkRequest> {
        let next = self.state.view.next_page_size();
        self.set_page_size(next)
    }

    /// Always lands on page 1.
    pub fn set_page_size(&mut self, page_size: u32) -> Option<NetworkRequest> {
        if !self.state.view.set_page_size(page_size) {
            return None;
        }
        self.state.detail_open = false;
        Some(self.request_current_page())
    }

    // -----------------------------------------------------------------------
    // Rows and selection
    // -----------------------------------------------------------------------

    /// Indices of the rows to draw, in display order.
    pub fn visible_rows(&mut self) -> &[usize] {
        let AppState { view, leaderboard, .. } = &mut self.state;
        view.visible(leaderboard.revision, leaderboard.players())
    }

    pub fn visible_len(&mut self) -> usize {
        self.visible_rows().len()
    }

    pub fn selected_player(&mut self) -> Option<&Player> {
        let selected = self.state.view.selected;
        let idx = *self.visible_rows().get(selected)?;
        self.state.leaderboard.players().get(idx)
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        self.state.view.select_next(len);
    }

    pub fn select_prev(&mut self) {
        self.state.view.select_prev();
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.state.view.select_sort(field);
    }

    pub fn cycle_region(&mut self) {
        self.state.view.cycle_region();
        self.state.detail_open = false;
    }

    // -----------------------------------------------------------------------
    // Search box
    // -----------------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.state.view.searching = true;
        self.state.detail_open = false;
    }

    pub fn stop_search(&mut self) {
        self.state.view.searching = false;
    }

    pub fn search_push(&mut self, c: char) {
        self.state.view.push_search_char(c);
    }

    pub fn search_pop(&mut self) {
        self.state.view.pop_search_char();
    }

    pub fn clear_search(&mut self) {
        self.state.view.clear_search();
    }

    // -----------------------------------------------------------------------
    // Panels
    // -----------------------------------------------------------------------

    pub fn toggle_detail(&mut self) {
        if self.state.detail_open {
            self.state.detail_open = false;
        } else if self.selected_player().is_some() {
            self.state.detail_open = true;
        }
    }

    pub fn close_popups(&mut self) {
        self.state.detail_open = false;
        self.state.show_help = false;
    }

    pub fn toggle_help(&mut self) {
        self.state.show_help = !self.state.show_help;
    }

    pub fn toggle_tiers(&mut self) {
        self.state.show_tiers = !self.state.show_tiers;
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn quit(&mut self) {
        self.state.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::view::SortDirection;
    use leaderboard_api::mock::MockSource;

    fn app() -> App {
        App::new(AppSettings::default())
    }

    fn load_id(request: &NetworkRequest) -> (u64, u32, u32) {
        match request {
            NetworkRequest::LoadPage { request_id, page, page_size } => {
                (*request_id, *page, *page_size)
            }
        }
    }

    /// Issue a request for the current page and answer it from the mock.
    fn load_current(app: &mut App) {
        let (id, page, size) = load_id(&app.request_current_page());
        let page = MockSource::new().page(page, size).unwrap();
        assert!(app.on_page_loaded(id, page));
    }

    #[test]
    fn page_size_change_restarts_from_page_one() {
        let mut app = app();
        load_current(&mut app);
        let (_, page, _) = load_id(&app.go_to_page(3).expect("page 3 is in range"));
        assert_eq!(page, 3);
        load_current(&mut app);

        let request = app.cycle_page_size().expect("size changes from 10 to 20");
        let (_, page, page_size) = load_id(&request);
        assert_eq!((page, page_size), (1, 20));
        assert_eq!(app.state.view.page, 1);
    }

    #[test]
    fn last_page_after_size_change_uses_the_new_size() {
        let mut app = app();
        load_current(&mut app);
        app.cycle_page_size().expect("10 -> 20");
        app.cycle_page_size().expect("20 -> 50");

        // The size-10 page is still loaded; 100 players at 50 per page is 2 pages.
        assert_eq!(app.total_pages(), Some(2));
        let (_, page, page_size) = load_id(&app.last_page().expect("page 2 exists"));
        assert_eq!((page, page_size), (2, 50));
        assert!(app.next_page().is_none());

        let (id, page, size) = load_id(&app.request_current_page());
        let loaded = MockSource::new().page(page, size).unwrap();
        assert!(!loaded.players.is_empty());
        assert!(app.on_page_loaded(id, loaded));
    }

    #[test]
    fn same_page_size_issues_nothing() {
        let mut app = app();
        assert!(app.set_page_size(10).is_none());
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut app = app();
        let (old_id, ..) = load_id(&app.request_current_page());
        let (new_id, ..) = load_id(&app.go_to_page(2).unwrap());

        let stale = MockSource::new().page(1, 10).unwrap();
        assert!(!app.on_page_loaded(old_id, stale));
        assert!(!app.state.leaderboard.is_loaded());
        assert!(!app.on_fetch_error(old_id, "late failure".into()));
        assert_eq!(app.state.last_error, None);

        let fresh = MockSource::new().page(2, 10).unwrap();
        assert!(app.on_page_loaded(new_id, fresh));
        assert_eq!(app.state.leaderboard.pagination().map(|p| p.page), Some(2));
    }

    #[test]
    fn live_snapshot_for_other_page_is_ignored() {
        let mut app = app();
        load_current(&mut app);
        let revision = app.state.leaderboard.revision;

        let other_page = MockSource::new().page(2, 10).unwrap();
        assert!(!app.on_live_snapshot(other_page));
        let other_size = MockSource::new().page(1, 20).unwrap();
        assert!(!app.on_live_snapshot(other_size));
        assert_eq!(app.state.leaderboard.revision, revision);

        app.state.last_error = Some("backend down".into());
        let same = MockSource::new().page(1, 10).unwrap();
        assert!(app.on_live_snapshot(same));
        assert_eq!(app.state.last_error, None);
        assert_eq!(app.state.leaderboard.revision, revision + 1);
        assert_eq!(app.state.leaderboard.origin, Some(UpdateOrigin::Live));
        assert_eq!(app.state.live.snapshots_applied, 1);
    }

    #[test]
    fn navigation_is_clamped_to_known_pages() {
        let mut app = app();
        load_current(&mut app);
        assert!(app.prev_page().is_none());
        assert!(app.go_to_page(0).is_none());

        let (_, page, _) = load_id(&app.last_page().unwrap());
        assert_eq!(page, 10);
        load_current(&mut app);
        assert!(app.next_page().is_none());
        assert!(app.go_to_page(99).is_none());
    }

    #[test]
    fn error_keeps_the_previous_page() {
        let mut app = app();
        load_current(&mut app);
        let (id, ..) = load_id(&app.retry());
        assert!(app.on_fetch_error(id, "backend down".into()));
        assert!(app.state.leaderboard.is_loaded());
        assert_eq!(app.state.last_error.as_deref(), Some("backend down"));

        load_current(&mut app);
        assert_eq!(app.state.last_error, None);
    }

    #[test]
    fn selection_tracks_the_sorted_rows() {
        let mut app = app();
        load_current(&mut app);
        assert_eq!(app.selected_player().map(|p| p.rank), Some(1));

        app.sort_by(SortField::Rank);
        assert_eq!(app.state.view.filter.sort_direction, SortDirection::Desc);
        assert_eq!(app.selected_player().map(|p| p.rank), Some(10));

        app.select_next();
        assert_eq!(app.selected_player().map(|p| p.rank), Some(9));
    }

    #[test]
    fn detail_needs_a_selected_player() {
        let mut app = app();
        app.toggle_detail();
        assert!(!app.state.detail_open);

        load_current(&mut app);
        app.toggle_detail();
        assert!(app.state.detail_open);
        app.close_popups();
        assert!(!app.state.detail_open);
    }
}
