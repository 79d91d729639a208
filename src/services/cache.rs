use crate::models::{PlayerDto, PlayerRecord};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Source of the full player directory
///
/// Implemented by the Postgres client in production and by in-memory stubs
/// in tests.
pub trait PlayerDirectory {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_players(
        &self,
    ) -> impl Future<Output = Result<Vec<PlayerRecord>, Self::Error>> + Send;
}

/// One cached directory snapshot
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub players: Vec<PlayerDto>,
    pub fetched_at: DateTime<Utc>,
}

/// Read-through cache in front of the player directory
///
/// Holds zero or one snapshot. A miss fetches the full directory, projects
/// it to `PlayerDto`, and publishes a freshly built `Arc` in one swap, so
/// readers never observe a partially written entry. Concurrent misses may
/// fetch twice; both publish complete snapshots. Eviction is wholesale and
/// does not pre-warm: the next `get_all` pays the full fetch cost.
pub struct PlayerCache<D> {
    directory: D,
    entry: RwLock<Option<Arc<PlayerSnapshot>>>,
}

impl<D: PlayerDirectory> PlayerCache<D> {
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            entry: RwLock::new(None),
        }
    }

    /// Return the cached snapshot, fetching from the directory on a miss.
    pub async fn get_all(&self) -> Result<Arc<PlayerSnapshot>, D::Error> {
        if let Some(snapshot) = self.entry.read().await.as_ref() {
            tracing::trace!("Players cache hit ({} players)", snapshot.players.len());
            return Ok(Arc::clone(snapshot));
        }

        // Fetch outside the lock; a concurrent miss doing the same work is
        // harmless, the later publish wins with an equally complete snapshot.
        tracing::info!("Fetching all players from directory (cache miss)");
        let records = self.directory.fetch_players().await?;
        let snapshot = Arc::new(PlayerSnapshot {
            players: records.iter().map(PlayerDto::from).collect(),
            fetched_at: Utc::now(),
        });
        tracing::debug!("Found {} players in directory", snapshot.players.len());

        *self.entry.write().await = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Unconditionally clear the snapshot.
    pub async fn evict_all(&self) {
        tracing::info!("Evicting players cache");
        *self.entry.write().await = None;
    }

    pub async fn is_cached(&self) -> bool {
        self.entry.read().await.is_some()
    }
}

/// Start the periodic full eviction of the players cache.
///
/// Ticks every `period`, with the first tick delayed by one full period
/// after startup. The tick itself only swaps the entry out, so concurrent
/// `get_all` calls are never blocked for longer than the swap.
pub fn spawn_eviction_task<D>(cache: Arc<PlayerCache<D>>, period: Duration)
where
    D: PlayerDirectory + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        loop {
            interval.tick().await;
            cache.evict_all().await;
        }
    });
}
