use crate::app::App;
use crate::state::messages::NetworkRequest;
use crate::state::view::SortField;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let request = {
        let mut guard = app.lock().await;
        apply_key(&mut guard, key_event)
    };

    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}

/// Apply one key press. Returns the page load it triggered, if any.
pub fn apply_key(app: &mut App, key_event: KeyEvent) -> Option<NetworkRequest> {
    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        app.quit();
        return None;
    }

    if app.state.view.searching {
        match key_event.code {
            KeyCode::Enter | KeyCode::Esc => app.stop_search(),
            KeyCode::Backspace => app.search_pop(),
            Char(c) => app.search_push(c),
            _ => {}
        }
        return None;
    }

    match (key_event.code, key_event.modifiers) {
        (Char('q'), _) => app.quit(),

        // Popups swallow Esc before anything else sees it.
        (KeyCode::Esc, _) => app.close_popups(),
        (Char('?'), _) => app.toggle_help(),

        // Pages
        (Char('l') | KeyCode::Right, _) => return app.next_page(),
        (Char('h') | KeyCode::Left, _) => return app.prev_page(),
        (Char('g') | KeyCode::Home, _) => return app.first_page(),
        (Char('G') | KeyCode::End, _) => return app.last_page(),
        (Char('p'), _) => return app.cycle_page_size(),
        (Char('r'), _) => return Some(app.retry()),

        // Rows
        (Char('j') | KeyCode::Down, _) => app.select_next(),
        (Char('k') | KeyCode::Up, _) => app.select_prev(),
        (KeyCode::Enter, _) => app.toggle_detail(),

        // Sort and filter
        (Char('1'), _) => app.sort_by(SortField::Rank),
        (Char('2'), _) => app.sort_by(SortField::Elo),
        (Char('3'), _) => app.sort_by(SortField::Wins),
        (Char('4'), _) => app.sort_by(SortField::Losses),
        (Char('5'), _) => app.sort_by(SortField::Clan),
        (Char('f'), _) => app.cycle_region(),
        (Char('/'), _) => app.start_search(),
        (Char('c'), _) => app.clear_search(),

        // Global
        (Char('t'), _) => app.toggle_tiers(),
        (Char('F'), _) => app.toggle_full_screen(),
        (Char('"'), _) => app.toggle_show_logs(),

        _ => {}
    }
    None
}
