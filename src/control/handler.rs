//! JSON-lines harness: stdin commands in, feed lines out on stdout

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::game::session::DuelHandle;
use crate::util::rate_limit::CommandRateLimiter;

use super::protocol::{DuelCommand, DuelFeed, FeedLine};

#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode feed line: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Attach a command source and a feed sink to a running session.
///
/// The feed keeps flowing after the command source closes and ends once
/// every feed sender is gone, which happens when the session stops and the
/// remaining handles are dropped.
pub async fn run<R, W>(
    reader: R,
    out: W,
    handle: DuelHandle,
    feed_rx: broadcast::Receiver<DuelFeed>,
) -> Result<(), ControlError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let input = async move {
        let result = forward_commands(reader, &handle).await;
        // Release this feed sender so the writer can see the channel close
        drop(handle);
        result
    };

    let (input_result, output_result) = tokio::join!(input, write_feed(out, feed_rx));
    input_result?;
    output_result
}

/// Reader loop: command lines -> session
pub async fn forward_commands<R>(reader: R, handle: &DuelHandle) -> Result<(), ControlError>
where
    R: AsyncBufRead + Unpin,
{
    let rate_limiter = CommandRateLimiter::new();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match serde_json::from_str::<DuelCommand>(line) {
            Ok(command) => command,
            Err(e) => {
                warn!(duel_id = %handle.id, error = %e, "Failed to parse control command");
                continue;
            }
        };

        // Shutdown is never throttled
        let shutdown = command == DuelCommand::Shutdown;
        if !shutdown && !rate_limiter.check() {
            warn!(duel_id = %handle.id, "Rate limited control command");
            continue;
        }

        if !handle.send(command).await {
            debug!(duel_id = %handle.id, "Command channel closed");
            break;
        }
        if shutdown {
            break;
        }
    }

    info!(duel_id = %handle.id, "Control input closed");
    Ok(())
}

/// Writer loop: feed -> timestamped JSON lines, until the feed closes
pub async fn write_feed<W>(mut out: W, mut feed_rx: broadcast::Receiver<DuelFeed>) -> Result<(), ControlError>
where
    W: AsyncWrite + Unpin,
{
    loop {
        match feed_rx.recv().await {
            Ok(feed) => {
                if let Err(e) = write_line(&mut out, &feed).await {
                    debug!(error = %e, "Feed write failed");
                    return Err(e);
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(lagged_count = n, "Feed writer lagged, skipping {} items", n);
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Feed channel closed");
                return Ok(());
            }
        }
    }
}

/// Write one feed item as a JSON line
async fn write_line<W>(out: &mut W, feed: &DuelFeed) -> Result<(), ControlError>
where
    W: AsyncWrite + Unpin,
{
    let mut json = serde_json::to_vec(&FeedLine::now(feed))?;
    json.push(b'\n');
    out.write_all(&json).await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::protocol::DuelInput;
    use crate::game::combatant::Side;
    use crate::game::events::DuelEvent;
    use std::time::Duration;
    use tokio::io::BufReader;
    use tokio::sync::mpsc;
    use tokio_test::assert_ok;
    use uuid::Uuid;

    fn test_handle() -> (DuelHandle, mpsc::Receiver<DuelInput>) {
        let (command_tx, command_rx) = mpsc::channel(128);
        let (feed_tx, _) = broadcast::channel(16);
        let handle = DuelHandle {
            id: Uuid::new_v4(),
            command_tx,
            feed_tx,
        };
        (handle, command_rx)
    }

    async fn read_json_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> serde_json::Value {
        let mut line = String::new();
        assert_ok!(reader.read_line(&mut line).await);
        assert_ok!(serde_json::from_str(line.trim()))
    }

    #[tokio::test]
    async fn test_forwards_valid_lines_and_skips_garbage() {
        let (handle, mut rx) = test_handle();
        let input = b"{\"type\":\"fire\",\"side\":\"one\"}\nnot json\n\n{\"type\":\"pause\"}\n" as &[u8];

        assert_ok!(forward_commands(input, &handle).await);

        assert_eq!(rx.recv().await.map(|i| i.command), Some(DuelCommand::Fire { side: Side::One }));
        assert_eq!(rx.recv().await.map(|i| i.command), Some(DuelCommand::Pause));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stops_reading_after_shutdown() {
        let (handle, mut rx) = test_handle();
        let input = b"{\"type\":\"shutdown\"}\n{\"type\":\"resume\"}\n" as &[u8];

        assert_ok!(forward_commands(input, &handle).await);

        assert_eq!(rx.recv().await.map(|i| i.command), Some(DuelCommand::Shutdown));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_shutdown_passes_rate_limit() {
        let (handle, mut rx) = test_handle();
        let mut input = "{\"type\":\"fire\",\"side\":\"two\"}\n".repeat(60);
        input.push_str("{\"type\":\"shutdown\"}\n");

        assert_ok!(forward_commands(input.as_bytes(), &handle).await);

        let mut commands = Vec::new();
        while let Ok(received) = rx.try_recv() {
            commands.push(received.command);
        }
        assert_eq!(commands.last(), Some(&DuelCommand::Shutdown));

        let fired = commands.iter().filter(|c| matches!(c, DuelCommand::Fire { .. })).count();
        assert!(fired < 60, "burst of {fired} fire commands not throttled");
    }

    #[tokio::test]
    async fn test_writer_emits_json_lines() {
        let (handle, _rx) = test_handle();
        let (client, mut server) = tokio::io::duplex(4096);
        let writer = tokio::spawn(write_feed(client, handle.subscribe()));

        assert_ok!(handle.feed_tx.send(DuelFeed::Event {
            tick: 7,
            event: DuelEvent::KillCamEnded,
        }));

        let json = read_json_line(&mut BufReader::new(&mut server)).await;
        assert_eq!(json["type"], "event");
        assert_eq!(json["tick"], 7);

        writer.abort();
    }

    #[tokio::test]
    async fn test_feed_outlives_closed_input() {
        let (handle, _rx) = test_handle();
        let feed_tx = handle.feed_tx.clone();
        let feed_rx = handle.subscribe();
        let (client, mut server) = tokio::io::duplex(4096);

        // Input is already at end of file
        let control = tokio::spawn(run(b"" as &[u8], client, handle, feed_rx));

        for tick in [3, 4] {
            assert_ok!(feed_tx.send(DuelFeed::Event {
                tick,
                event: DuelEvent::KillCamEnded,
            }));
        }

        let mut reader = BufReader::new(&mut server);
        assert_eq!(read_json_line(&mut reader).await["tick"], 3);
        assert_eq!(read_json_line(&mut reader).await["tick"], 4);

        // Writer finishes once the last feed sender is gone
        drop(feed_tx);
        let joined = tokio::time::timeout(Duration::from_secs(5), control).await;
        assert_ok!(assert_ok!(assert_ok!(joined)));
    }
}
