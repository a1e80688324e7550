mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::live::{LiveCommand, LiveConfig, LiveEvent, LiveWorker};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use leaderboard_api::client::LeaderboardApi;
use leaderboard_api::mock::MockSource;
use leaderboard_api::source::LeaderboardSource;
use log::{error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::{Duration, timeout};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, Default)]
struct CliOptions {
    mock: bool,
    no_live: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(options) = handle_cli_args() else {
        return Ok(());
    };

    tui_logger::init_logger(log::LevelFilter::Warn)?;
    tui_logger::set_default_level(log::LevelFilter::Warn);

    let mut settings = AppSettings::load();
    settings.use_mock = options.mock;
    if options.no_live {
        settings.live_url = None;
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (live_cmd_tx, live_cmd_rx) = mpsc::channel::<LiveCommand>(100);
    let (live_evt_tx, live_evt_rx) = mpsc::channel::<LiveEvent>(100);

    // Network thread
    let (network_task, source_label) = if settings.use_mock {
        spawn_network_worker(MockSource::new(), network_req_rx, network_resp_tx)
    } else {
        let api = LeaderboardApi::new(settings.api_url.clone());
        spawn_network_worker(api, network_req_rx, network_resp_tx)
    };
    info!("loading leaderboard from {source_label}");

    let mut app = App::new(settings.clone());
    app.state.source_label = source_label;
    let app = Arc::new(Mutex::new(app));

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Live update thread
    let live_task = settings.live_url.clone().map(|url| {
        info!("live updates from {url}");
        let worker = LiveWorker::new(LiveConfig::new(url), live_cmd_rx, live_evt_tx.clone());
        tokio::spawn(worker.run())
    });

    // Periodic page reload
    let periodic_task = settings.refresh_every.map(|period| {
        tokio::spawn(PeriodicRefresher::new(ui_event_tx.clone(), period).run())
    });

    // Trigger first page load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
        live_evt_rx,
    )
    .await;

    if let Some(live_task) = live_task {
        let _ = live_cmd_tx.send(LiveCommand::Shutdown).await;
        if timeout(Duration::from_secs(1), live_task).await.is_err() {
            error!("live channel did not shut down in time");
        }
    }
    drop(live_evt_tx);

    input_handler.abort();
    network_task.abort();
    if let Some(periodic_task) = periodic_task {
        periodic_task.abort();
    }

    cleanup_terminal()?;
    Ok(())
}

fn spawn_network_worker<S: LeaderboardSource>(
    source: S,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
) -> (tokio::task::JoinHandle<()>, String) {
    let label = source.describe();
    let worker = NetworkWorker::new(source, requests, responses);
    (tokio::spawn(worker.run()), label)
}

/// `None` when the process should exit without starting the UI.
fn handle_cli_args() -> Option<CliOptions> {
    let mut options = CliOptions::default();

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return None;
            }
            "-V" | "--version" => {
                println!("duelboard {}", env!("CARGO_PKG_VERSION"));
                return None;
            }
            "--mock" => options.mock = true,
            "--no-live" => options.no_live = true,
            _ => {
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }

    Some(options)
}

fn usage_text() -> &'static str {
    "duelboard - duel leaderboard terminal UI

Usage:
  duelboard [--mock] [--no-live]
  duelboard --help
  duelboard --version

Options:
  --mock      Serve pages from built-in generated players
  --no-live   Do not open the live update channel

Environment:
  DUELBOARD_API_URL       Leaderboard API origin (default http://localhost:8000)
  DUELBOARD_LIVE_WS       Live update ws:// URL, or \"off\" (default ws://localhost:8000/ws)
  DUELBOARD_PAGE_SIZE     Initial page size: 10, 20 or 50 (default 10)
  DUELBOARD_REFRESH_SECS  Reload interval in seconds, 0 disables (default 30)
  DUELBOARD_LOG           Log level shown in the log pane (default warn)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    mut live_events: mpsc::Receiver<LiveEvent>,
) {
    let mut loading = LoadingState::default();

    loop {
        let should_redraw = tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                handle_ui_event(ui_event, &app, &network_requests).await
            }

            Some(response) = network_responses.recv() => {
                handle_network_response(response, &app, &mut loading).await
            }

            Some(live_event) = live_events.recv() => {
                handle_live_event(live_event, &app).await
            }

            else => break,
        };

        let mut app_guard = app.lock().await;
        if app_guard.state.should_quit {
            break;
        }
        if should_redraw {
            draw::draw(&mut terminal, &mut app_guard, loading);
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted | UiEvent::RefreshTick => {
            let request = app.lock().await.request_current_page();
            let _ = network_requests.send(request).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_live_event(event: LiveEvent, app: &Arc<Mutex<App>>) -> bool {
    let mut guard = app.lock().await;
    match event {
        LiveEvent::StateChanged(state) => {
            guard.on_live_state(state);
            true
        }
        LiveEvent::Snapshot(page) => guard.on_live_snapshot(page),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            true
        }
        NetworkResponse::PageLoaded { request_id, page } => {
            app.lock().await.on_page_loaded(request_id, page)
        }
        NetworkResponse::Error { request_id, message } => {
            error!("Network error: {message}");
            app.lock().await.on_fetch_error(request_id, message)
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0))?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    execute!(stdout, terminal::LeaveAlternateScreen)?;
    execute!(stdout, cursor::Show)?;
    terminal::disable_raw_mode()
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let _ = cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
