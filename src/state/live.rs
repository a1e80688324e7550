use futures_util::{SinkExt, StreamExt};
use leaderboard_api::LeaderboardPage;
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::{Duration, interval, sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Liveness token sent while the socket is open.
pub const PING_FRAME: &str = "ping";
const PONG_FRAME: &str = "pong";

pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Connection lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Open,
    Closed,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Connect,
    Opened,
    Closed,
    Failed,
    TornDown,
}

impl ConnectionState {
    /// `None` for a transition the lifecycle does not allow.
    pub fn apply(self, transition: Transition) -> Option<ConnectionState> {
        use ConnectionState::*;
        match (self, transition) {
            (_, Transition::TornDown) => Some(Disconnected),
            (Disconnected | Closed | Errored, Transition::Connect) => Some(Connecting),
            (Connecting, Transition::Opened) => Some(Open),
            (Connecting | Open, Transition::Failed) => Some(Errored),
            (Open, Transition::Closed) => Some(Closed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "off",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "on",
            ConnectionState::Closed => "closed",
            ConnectionState::Errored => "retrying",
        }
    }

    pub fn is_open(&self) -> bool {
        *self == ConnectionState::Open
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum LiveCommand {
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum LiveEvent {
    StateChanged(ConnectionState),
    Snapshot(LeaderboardPage),
}

#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub url: String,
    pub ping_interval: Duration,
    pub reconnect_delay: Duration,
}

impl LiveConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ping_interval: DEFAULT_PING_INTERVAL,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

enum SessionEnd {
    Closed,
    Failed,
    Shutdown,
}

enum Step {
    Shutdown,
    Ping,
    Inbound(Option<Result<Message, tokio_tungstenite::tungstenite::Error>>),
}

/// Owns the single live connection and reconnects it until told to stop.
///
/// Snapshots go out on `events` unfiltered; deciding whether one belongs to
/// the page on screen is the app's job.
#[derive(Debug)]
pub struct LiveWorker {
    config: LiveConfig,
    state: ConnectionState,
    commands: mpsc::Receiver<LiveCommand>,
    events: mpsc::Sender<LiveEvent>,
}

impl LiveWorker {
    pub fn new(
        config: LiveConfig,
        commands: mpsc::Receiver<LiveCommand>,
        events: mpsc::Sender<LiveEvent>,
    ) -> Self {
        Self {
            config,
            state: ConnectionState::Disconnected,
            commands,
            events,
        }
    }

    pub async fn run(mut self) {
        loop {
            self.transition(Transition::Connect).await;

            let url = self.config.url.clone();
            let connected = tokio::select! {
                _ = self.commands.recv() => None,
                result = connect_async(url.as_str()) => Some(result),
            };

            let end = match connected {
                None => SessionEnd::Shutdown,
                Some(Ok((stream, _))) => {
                    info!("live channel connected to {url}");
                    self.transition(Transition::Opened).await;
                    self.serve(stream).await
                }
                Some(Err(e)) => {
                    debug!("live channel connect to {url} failed: {e}");
                    SessionEnd::Failed
                }
            };

            match end {
                SessionEnd::Shutdown => break,
                SessionEnd::Closed => self.transition(Transition::Closed).await,
                SessionEnd::Failed => self.transition(Transition::Failed).await,
            }

            let stop = tokio::select! {
                _ = self.commands.recv() => true,
                _ = sleep(self.config.reconnect_delay) => false,
            };
            if stop {
                break;
            }
        }

        self.transition(Transition::TornDown).await;
        debug!("live channel torn down");
    }

    async fn serve<S>(&mut self, stream: S) -> SessionEnd
    where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
            + Unpin,
    {
        let (mut write, mut read) = stream.split();
        let mut ping = interval(self.config.ping_interval);
        // First tick is immediate; the first ping goes out one interval after open.
        ping.tick().await;

        loop {
            let step = tokio::select! {
                _ = self.commands.recv() => Step::Shutdown,
                _ = ping.tick() => Step::Ping,
                inbound = read.next() => Step::Inbound(inbound),
            };

            match step {
                Step::Shutdown => {
                    let _ = write.send(Message::Close(None)).await;
                    return SessionEnd::Shutdown;
                }
                Step::Ping => {
                    if let Err(e) = write.send(Message::Text(PING_FRAME.to_string().into())).await {
                        warn!("live channel ping failed: {e}");
                        return SessionEnd::Failed;
                    }
                }
                Step::Inbound(Some(Ok(Message::Text(text)))) => {
                    let Some(snapshot) = decode_snapshot(text.as_str()) else {
                        continue;
                    };
                    if self.events.send(LiveEvent::Snapshot(snapshot)).await.is_err() {
                        return SessionEnd::Shutdown;
                    }
                }
                Step::Inbound(Some(Ok(Message::Close(_)))) | Step::Inbound(None) => {
                    info!("live channel closed by server");
                    return SessionEnd::Closed;
                }
                Step::Inbound(Some(Ok(_))) => {}
                Step::Inbound(Some(Err(e))) => {
                    warn!("live channel read failed: {e}");
                    return SessionEnd::Failed;
                }
            }
        }
    }

    async fn transition(&mut self, transition: Transition) {
        match self.state.apply(transition) {
            Some(next) => {
                self.state = next;
                let _ = self.events.send(LiveEvent::StateChanged(next)).await;
            }
            None => debug!("ignoring {transition:?} in state {:?}", self.state),
        }
    }
}

/// Decode one inbound text frame. Unparsable frames are logged and dropped.
pub fn decode_snapshot(text: &str) -> Option<LeaderboardPage> {
    if text.trim() == PONG_FRAME {
        return None;
    }
    match LeaderboardPage::from_json(text) {
        Ok(page) => Some(page),
        Err(e) => {
            warn!("dropping malformed live frame: {e}");
            None
        }
    }
}
