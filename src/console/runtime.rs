//! Long-running loops around a [`Console`]: the live `watch` session and
//! one-shot channel commands.

use super::Console;
use crate::channel::{ChannelError, ChannelHandle, ControlCommand, PushEvent};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Housekeeping period for emphasis and notice expiry.
const HOUSEKEEPING: Duration = Duration::from_secs(1);

/// Where and how often a watch session talks to the backend.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub socket_url: String,
    pub reconnect_delay: Duration,
    pub refresh_interval: Duration,
}

/// Drive a console until cancelled.
///
/// `render` is called after the initial load and after every change.
pub async fn watch<F>(
    console: &mut Console,
    options: WatchOptions,
    cancel: CancellationToken,
    mut render: F,
) where
    F: FnMut(&Console),
{
    let (channel, mut events) = ChannelHandle::spawn(
        options.socket_url.clone(),
        options.reconnect_delay,
        cancel.child_token(),
    );

    console.refresh_all(true).await;
    console.refresh_status().await;
    render(console);

    let mut refresh = tokio::time::interval_at(
        Instant::now() + options.refresh_interval,
        options.refresh_interval,
    );
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut housekeeping = tokio::time::interval(HOUSEKEEPING);
    housekeeping.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        url = %options.socket_url,
        refresh_seconds = options.refresh_interval.as_secs(),
        "Watching backend"
    );

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::info!("Watch cancelled");
                break;
            }

            event = events.recv() => match event {
                Ok(event) => {
                    console.handle(event, Instant::now().into_std()).await;
                    render(console);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Console fell behind the push channel");
                }
                Err(RecvError::Closed) => {
                    tracing::warn!("Push channel closed");
                    break;
                }
            },

            _ = refresh.tick() => {
                // Periodic refresh only while the system runs
                if console.status().snapshot().running {
                    tracing::debug!("Periodic refresh");
                    console.refresh_all(false).await;
                    render(console);
                }
            }

            _ = housekeeping.tick() => {
                if console.tick(Instant::now().into_std()) {
                    render(console);
                }
            }
        }
    }

    channel.shutdown().await;
}

/// Connect, send one command once the namespace is joined, and disconnect.
///
/// Fails if no `Connected` event arrives within `connect_timeout`.
pub async fn send_command(
    socket_url: &str,
    reconnect_delay: Duration,
    command: ControlCommand,
    connect_timeout: Duration,
) -> Result<(), ChannelError> {
    let (channel, mut events) = ChannelHandle::spawn(
        socket_url.to_string(),
        reconnect_delay,
        CancellationToken::new(),
    );

    let joined = tokio::time::timeout(connect_timeout, async {
        loop {
            match events.recv().await {
                Ok(PushEvent::Connected) => return Ok(()),
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return Err(ChannelError::Closed),
            }
        }
    })
    .await;

    let result = match joined {
        Ok(Ok(())) => {
            tracing::info!(event = command.event_name(), "Sending command");
            channel.send(command)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ChannelError::Connect(format!(
            "no connection to {} within {}s",
            socket_url,
            connect_timeout.as_secs()
        ))),
    };

    channel.shutdown().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::RefreshConfig;

    const DEAD_SOCKET: &str = "ws://127.0.0.1:1/socket.io/?EIO=4&transport=websocket";

    #[tokio::test]
    async fn test_send_command_times_out_without_backend() {
        let result = send_command(
            DEAD_SOCKET,
            Duration::from_millis(10),
            ControlCommand::AcknowledgeEmergency,
            Duration::from_millis(100),
        )
        .await;
        assert!(matches!(result, Err(ChannelError::Connect(_))));
    }

    #[tokio::test]
    async fn test_watch_renders_once_and_stops_on_cancel() {
        let api = ApiClient::with_client("http://127.0.0.1:1", reqwest::Client::new(), 1);
        let mut console = Console::new(api, &RefreshConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut renders = 0;
        watch(
            &mut console,
            WatchOptions {
                socket_url: DEAD_SOCKET.to_string(),
                reconnect_delay: Duration::from_millis(10),
                refresh_interval: Duration::from_secs(60),
            },
            cancel,
            |_| renders += 1,
        )
        .await;

        assert_eq!(renders, 1);
        // Every panel failed against the dead backend
        assert!(console.health().can_retry());
        assert!(console.overview().is_some());
    }
}
