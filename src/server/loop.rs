// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Upper bound on how long shutdown waits for open connections
const DRAIN_LIMIT: Duration = Duration::from_secs(5);
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Accept loop for the application server
///
/// Must run inside a `tokio::task::LocalSet`; connections are served with
/// `spawn_local`. Returns once shutdown is signalled and open connections
/// have finished or [`DRAIN_LIMIT`] has passed.
pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let local_addr = listener.local_addr()?;
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        // Created before the flag check so a concurrent shutdown is not missed
        let shutdown = signals.shutdown.notified();
        tokio::pin!(shutdown);
        if signals.is_shutdown_requested() {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_server_stop(&local_addr);
    drain_connections(&active_connections).await;
    Ok(())
}

/// Wait for in-flight connections, bounded by [`DRAIN_LIMIT`]
async fn drain_connections(active: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + DRAIN_LIMIT;

    while active.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutting down with {} connection(s) still open",
                active.load(Ordering::SeqCst)
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}
