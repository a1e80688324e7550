use futures_util::{SinkExt, StreamExt};
use leaderboard_api::mock::MockSource;
use std::env;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::time::interval;
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = env::var("DUELBOARD_RELAY_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let page_size = env_number("DUELBOARD_RELAY_PAGE_SIZE", 10u32).max(1);
    let every = Duration::from_secs(env_number("DUELBOARD_RELAY_INTERVAL_SECS", 5u64).max(1));

    let listener = TcpListener::bind(&addr).await?;
    let (tx, _rx) = broadcast::channel::<String>(64);

    eprintln!("live relay listening on {addr}, page size {page_size}, every {every:?}");
    tokio::spawn(publish_snapshots(tx.clone(), page_size, every));

    loop {
        let (stream, peer) = listener.accept().await?;
        let rx = tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, rx).await {
                eprintln!("client {peer} disconnected: {e}");
            }
        });
    }
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Walk the mock pages in order, one snapshot per tick.
async fn publish_snapshots(tx: broadcast::Sender<String>, page_size: u32, every: Duration) {
    let source = MockSource::new();
    let total_pages = leaderboard_api::total_pages(source.len() as u64, page_size).max(1);
    let mut ticker = interval(every);
    let mut page = 1;

    loop {
        ticker.tick().await;
        let text = match source.page(page, page_size).map(|p| serde_json::to_string(&p)) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                eprintln!("snapshot encode failed: {e}");
                continue;
            }
            Err(e) => {
                eprintln!("snapshot build failed: {e}");
                continue;
            }
        };
        // No subscribers is fine; the next client picks up the next tick.
        let _ = tx.send(text);
        page = page % total_pages + 1;
    }
}

async fn handle_client(
    stream: TcpStream,
    mut rx: broadcast::Receiver<String>,
) -> anyhow::Result<()> {
    let ws = accept_async(stream).await?;
    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            inbound = read.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    // Keepalive "ping" text frames and anything else inbound are ignored.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                }
            }
            outbound = rx.recv() => {
                match outbound {
                    Ok(text) => {
                        write.send(Message::Text(text.into())).await?;
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    Ok(())
}
