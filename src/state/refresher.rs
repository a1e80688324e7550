use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Periodic reload of the page on screen.
///
/// Goes through the UI loop rather than the network worker so the request
/// carries the current page, page size and a fresh request id.
pub struct PeriodicRefresher {
    ui_events: mpsc::Sender<UiEvent>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(ui_events: mpsc::Sender<UiEvent>, period: Duration) -> Self {
        Self { ui_events, period }
    }

    pub async fn run(self) {
        let mut refresh_interval = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        refresh_interval.tick().await;

        loop {
            refresh_interval.tick().await;
            if self.ui_events.send(UiEvent::RefreshTick).await.is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, timeout};

    #[tokio::test]
    async fn first_refresh_waits_a_full_period() {
        let (tx, mut rx) = mpsc::channel(4);
        let started = Instant::now();
        tokio::spawn(PeriodicRefresher::new(tx, Duration::from_millis(50)).run());

        let event = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert!(matches!(event, Some(UiEvent::RefreshTick)));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
