//! Per-request round store connections.
//!
//! A [`ConnectionGuard`] owns an acquired connection until it is released.
//! Handlers release it explicitly on every path. If the guard is dropped
//! first, for instance because the client went away and the request future
//! was cancelled, the release is spawned onto the runtime instead.

use std::time::Duration;

use morra_core::error::DomainError;
use morra_core::repository::{RoundConnection, RoundStore, StoredRound};
use tokio::runtime::Handle;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::warn;

/// Time allowed for closing a connection. Independent of the request
/// deadline, which may already have passed.
pub(crate) const RELEASE_TIMEOUT: Duration = Duration::from_secs(2);

/// An acquired connection that is released exactly once.
pub(crate) struct ConnectionGuard {
    connection: Option<Box<dyn RoundConnection>>,
}

/// Opens a connection, giving up at `deadline`.
pub(crate) async fn acquire(
    store: &dyn RoundStore,
    deadline: Instant,
) -> Result<ConnectionGuard, DomainError> {
    let connection = timeout_at(deadline, store.connect())
        .await
        .map_err(|_| DomainError::DeadlineExceeded)??;

    Ok(ConnectionGuard {
        connection: Some(connection),
    })
}

impl ConnectionGuard {
    pub(crate) async fn insert_round(&mut self, round: &StoredRound) -> Result<(), DomainError> {
        self.live()?.insert_round(round).await
    }

    pub(crate) async fn load_rounds(
        &mut self,
        game_id: &str,
    ) -> Result<Vec<StoredRound>, DomainError> {
        self.live()?.load_rounds(game_id).await
    }

    /// Closes the connection, waiting at most `limit`.
    pub(crate) async fn release(mut self, limit: Duration) {
        if let Some(connection) = self.connection.take() {
            release_within(connection, limit).await;
        }
    }

    fn live(&mut self) -> Result<&mut Box<dyn RoundConnection>, DomainError> {
        self.connection
            .as_mut()
            .ok_or_else(|| DomainError::Infrastructure("connection already released".into()))
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                warn!("round store connection dropped before release, releasing in background");
                handle.spawn(release_within(connection, RELEASE_TIMEOUT));
            }
            // The connection's own drop closes the socket.
            Err(_) => warn!("round store connection dropped outside a runtime"),
        }
    }
}

/// A failed or slow close is logged and otherwise ignored: the caller's
/// outcome is already decided.
async fn release_within(connection: Box<dyn RoundConnection>, limit: Duration) {
    match timeout(limit, connection.release()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(error = %err, "failed to release round store connection"),
        Err(_) => warn!(?limit, "timed out releasing round store connection"),
    }
}
