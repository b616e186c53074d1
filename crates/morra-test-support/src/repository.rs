//! Test round stores — mock `RoundStore` implementations for tests.
//!
//! Every store that hands out connections counts them in a
//! [`ConnectionLedger`], so tests can check that each acquired connection is
//! released exactly once.

use std::future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use morra_core::error::DomainError;
use morra_core::repository::{RoundConnection, RoundStore, StoredRound};

/// Counts connections handed out and given back.
#[derive(Debug, Default)]
pub struct ConnectionLedger {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl ConnectionLedger {
    /// Number of connections opened so far.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Number of connections released so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    fn record_acquire(&self) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
    }

    fn record_release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// A working in-memory store. Rounds written through one connection are
/// visible to every later connection.
#[derive(Debug, Default)]
pub struct InMemoryRoundStore {
    rounds: Arc<Mutex<Vec<StoredRound>>>,
    ledger: Arc<ConnectionLedger>,
}

impl InMemoryRoundStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `rounds`.
    #[must_use]
    pub fn with_rounds(rounds: Vec<StoredRound>) -> Self {
        Self {
            rounds: Arc::new(Mutex::new(rounds)),
            ledger: Arc::default(),
        }
    }

    /// Returns a snapshot of every stored round, in write order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn rounds(&self) -> Vec<StoredRound> {
        self.rounds.lock().unwrap().clone()
    }

    /// Connection counts for this store.
    pub fn ledger(&self) -> &ConnectionLedger {
        &self.ledger
    }
}

#[async_trait]
impl RoundStore for InMemoryRoundStore {
    async fn connect(&self) -> Result<Box<dyn RoundConnection>, DomainError> {
        self.ledger.record_acquire();
        Ok(Box::new(InMemoryConnection {
            rounds: Arc::clone(&self.rounds),
            ledger: Arc::clone(&self.ledger),
        }))
    }
}

struct InMemoryConnection {
    rounds: Arc<Mutex<Vec<StoredRound>>>,
    ledger: Arc<ConnectionLedger>,
}

#[async_trait]
impl RoundConnection for InMemoryConnection {
    async fn insert_round(&mut self, round: &StoredRound) -> Result<(), DomainError> {
        self.rounds.lock().unwrap().push(round.clone());
        Ok(())
    }

    async fn load_rounds(&mut self, game_id: &str) -> Result<Vec<StoredRound>, DomainError> {
        let mut rounds: Vec<StoredRound> = self
            .rounds
            .lock()
            .unwrap()
            .iter()
            .filter(|round| round.game_id == game_id)
            .cloned()
            .collect();
        rounds.sort_by_key(|round| (round.round_number, round.recorded_at));
        Ok(rounds)
    }

    async fn release(self: Box<Self>) -> Result<(), DomainError> {
        self.ledger.record_release();
        Ok(())
    }
}

/// A store that connects but fails every read and write. Useful for testing
/// error-handling paths.
#[derive(Debug, Default)]
pub struct FailingRoundStore {
    ledger: Arc<ConnectionLedger>,
}

impl FailingRoundStore {
    /// Create a new failing store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connection counts for this store.
    pub fn ledger(&self) -> &ConnectionLedger {
        &self.ledger
    }
}

#[async_trait]
impl RoundStore for FailingRoundStore {
    async fn connect(&self) -> Result<Box<dyn RoundConnection>, DomainError> {
        self.ledger.record_acquire();
        Ok(Box::new(FailingConnection {
            ledger: Arc::clone(&self.ledger),
        }))
    }
}

struct FailingConnection {
    ledger: Arc<ConnectionLedger>,
}

#[async_trait]
impl RoundConnection for FailingConnection {
    async fn insert_round(&mut self, _round: &StoredRound) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("write failed".into()))
    }

    async fn load_rounds(&mut self, _game_id: &str) -> Result<Vec<StoredRound>, DomainError> {
        Err(DomainError::Infrastructure("read failed".into()))
    }

    async fn release(self: Box<Self>) -> Result<(), DomainError> {
        self.ledger.record_release();
        Ok(())
    }
}

/// A store whose connection attempts are always refused.
#[derive(Debug)]
pub struct UnreachableRoundStore;

#[async_trait]
impl RoundStore for UnreachableRoundStore {
    async fn connect(&self) -> Result<Box<dyn RoundConnection>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A store that connects but never answers a read or write. Useful for
/// testing deadlines.
#[derive(Debug, Default)]
pub struct StallingRoundStore {
    ledger: Arc<ConnectionLedger>,
    stall_release: bool,
}

impl StallingRoundStore {
    /// Create a new stalling store. Releasing its connections succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stalling store whose connections also never finish closing.
    #[must_use]
    pub fn with_stalled_release() -> Self {
        Self {
            stall_release: true,
            ..Self::default()
        }
    }

    /// Connection counts for this store.
    pub fn ledger(&self) -> &ConnectionLedger {
        &self.ledger
    }
}

#[async_trait]
impl RoundStore for StallingRoundStore {
    async fn connect(&self) -> Result<Box<dyn RoundConnection>, DomainError> {
        self.ledger.record_acquire();
        Ok(Box::new(StallingConnection {
            ledger: Arc::clone(&self.ledger),
            stall_release: self.stall_release,
        }))
    }
}

struct StallingConnection {
    ledger: Arc<ConnectionLedger>,
    stall_release: bool,
}

#[async_trait]
impl RoundConnection for StallingConnection {
    async fn insert_round(&mut self, _round: &StoredRound) -> Result<(), DomainError> {
        future::pending().await
    }

    async fn load_rounds(&mut self, _game_id: &str) -> Result<Vec<StoredRound>, DomainError> {
        future::pending().await
    }

    async fn release(self: Box<Self>) -> Result<(), DomainError> {
        if self.stall_release {
            future::pending::<()>().await;
        }
        self.ledger.record_release();
        Ok(())
    }
}
