//! Owned network cache with time-to-live expiry.
//!
//! # Concurrency
//!
//! The live network is an `Arc<Network>` behind a `RwLock` that is held
//! only long enough to clone or replace the pointer.  Readers therefore get
//! either the old or the new network, never a half-built one.  Rebuilds are
//! serialised by a separate mutex: when several requests find the cache
//! stale, one rebuilds and the others wait for it, then reuse its result.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use rr_core::NodeId;

use crate::description::NetworkDescription;
use crate::network::Network;
use crate::NetworkResult;

/// Default network time-to-live: 1 hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3_600);

/// Where a rebuild gets its network from.
#[derive(Clone, Debug)]
pub enum NetworkSource {
    /// The last description handed to the store.
    Description(NetworkDescription),
    /// [`NetworkDescription::sample_grid`].
    Sample,
}

impl NetworkSource {
    fn build(&self) -> NetworkResult<Network> {
        match self {
            NetworkSource::Description(d) => d.build(),
            NetworkSource::Sample => NetworkDescription::sample_grid().build(),
        }
    }
}

/// Holds at most one [`Network`] and rebuilds it lazily once it is older
/// than the configured time-to-live.
pub struct NetworkStore {
    source:       RwLock<NetworkSource>,
    ttl:          Duration,
    current:      RwLock<Option<Arc<Network>>>,
    rebuild_lock: Mutex<()>,
}

impl NetworkStore {
    pub fn new(source: NetworkSource, ttl: Duration) -> Self {
        Self {
            source: RwLock::new(source),
            ttl,
            current: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// A store that serves the fixed sample grid with the default TTL.
    pub fn with_sample() -> Self {
        Self::new(NetworkSource::Sample, DEFAULT_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Build `description`, make it the rebuild source, and swap the result
    /// in.  On error the cached network and the previous source are kept.
    pub fn load(&self, description: NetworkDescription) -> NetworkResult<Arc<Network>> {
        let network = Arc::new(description.build()?);
        let _guard = self.rebuild_lock.lock();
        *self.source.write() = NetworkSource::Description(description);
        *self.current.write() = Some(Arc::clone(&network));
        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "loaded road network"
        );
        Ok(network)
    }

    /// The cached network if it is younger than the TTL, otherwise a freshly
    /// rebuilt one.
    pub fn get_network(&self) -> NetworkResult<Arc<Network>> {
        if let Some(network) = self.fresh() {
            return Ok(network);
        }
        let _guard = self.rebuild_lock.lock();
        self.fresh_or_rebuild_locked()
    }

    /// The cached network regardless of age, without triggering a rebuild.
    pub fn cached(&self) -> Option<Arc<Network>> {
        self.current.read().clone()
    }

    /// Override the cached congestion weight of the `from → to` edge.
    ///
    /// The live network is replaced by an edited copy; searches already
    /// holding the old `Arc` are unaffected.  The override lasts until the
    /// next rebuild.
    pub fn update_edge_weight(&self, from: NodeId, to: NodeId, weight: f64) -> NetworkResult<()> {
        let _guard = self.rebuild_lock.lock();
        let base = self.fresh_or_rebuild_locked()?;
        let edited = Arc::new(base.with_congestion_weight(from, to, weight)?);
        *self.current.write() = Some(edited);
        Ok(())
    }

    /// Force the next [`get_network`](Self::get_network) to rebuild.
    pub fn invalidate_cache(&self) {
        *self.current.write() = None;
        info!("road network cache invalidated");
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn fresh(&self) -> Option<Arc<Network>> {
        self.current
            .read()
            .as_ref()
            .filter(|n| n.age() < self.ttl)
            .cloned()
    }

    /// Caller must hold `rebuild_lock`.
    fn fresh_or_rebuild_locked(&self) -> NetworkResult<Arc<Network>> {
        // Another caller may have rebuilt while we waited for the lock.
        if let Some(network) = self.fresh() {
            return Ok(network);
        }
        let network = Arc::new(self.source.read().build()?);
        *self.current.write() = Some(Arc::clone(&network));
        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "rebuilt road network"
        );
        Ok(network)
    }
}

impl Default for NetworkStore {
    fn default() -> Self {
        Self::with_sample()
    }
}
