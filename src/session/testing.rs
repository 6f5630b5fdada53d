//! Helpers for driving sessions in tests

use super::delay::ThinkingDelay;
use super::runtime::{DialogueHandle, SessionRuntime, SessionSnapshot};
use crate::resolver::ResponseResolver;
use std::time::Duration;

const WAIT_LIMIT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Session with a near-zero thinking delay
pub fn fast_session(resolver: ResponseResolver) -> DialogueHandle {
    SessionRuntime::spawn(
        "test-session",
        resolver,
        ThinkingDelay::Fixed(Duration::from_millis(1)),
    )
}

/// Poll until the log holds `count` messages and no turn is pending
pub async fn wait_for_messages(handle: &DialogueHandle, count: usize) -> SessionSnapshot {
    let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
    loop {
        let snapshot = handle.snapshot().await.unwrap();
        if snapshot.messages.len() >= count && !snapshot.typing {
            return snapshot;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {count} messages, have {}",
            snapshot.messages.len()
        );
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
