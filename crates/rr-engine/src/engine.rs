//! [`RoutingEngine`] — the one handle an application holds.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use rr_congestion::{
    CongestionGenerator, CongestionLedger, CongestionLevel, CongestionSample, RefreshScheduler,
    SyntheticGenerator,
};
use rr_core::{CoreError, Coordinate, EngineConfig, NodeId};
use rr_network::{Network, NetworkDescription, NetworkSource, NetworkStore};
use rr_route::{AStarRouter, Route, Router};

use crate::EngineResult;

// ── RoutingEngine ─────────────────────────────────────────────────────────────

/// Network cache, congestion ledger, refresh scheduler and router behind
/// one `Sync` handle.
///
/// Queries may run from any number of threads while a refresh is active;
/// each query sees one consistent snapshot of the ledger.
pub struct RoutingEngine<R: Router = AStarRouter> {
    config:    EngineConfig,
    store:     NetworkStore,
    ledger:    Arc<CongestionLedger>,
    scheduler: RefreshScheduler,
    router:    R,
}

impl<R: Router> RoutingEngine<R> {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<CongestionLedger> {
        &self.ledger
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Route between two coordinates on the current network.
    ///
    /// The network is rebuilt first if its TTL has elapsed.  With
    /// `append_endpoints` set, the exact query coordinates bracket the
    /// returned path.
    pub fn find_route(&self, start: Coordinate, destination: Coordinate) -> EngineResult<Route> {
        for c in [start, destination] {
            if !c.is_valid() {
                return Err(CoreError::InvalidCoordinate { lat: c.lat, lon: c.lon }.into());
            }
        }
        let network = self.store.get_network()?;
        let route = rr_route::find_route(&self.router, start, destination, &network, &self.ledger)?;
        debug!(
            segments = route.segments.len(),
            distance_km = route.total_distance_km,
            time_min = route.estimated_time_min,
            "route computed"
        );

        Ok(if self.config.append_endpoints {
            route.with_endpoints(start, destination)
        } else {
            route
        })
    }

    /// Current level of every segment of `route`, in path order.
    ///
    /// A segment with a ledger sample reports the sample's level.  Without
    /// one it reports the level of the edge's cached congestion weight in
    /// the current network, the same multiplier the search charged.
    pub fn levels_for_route(&self, route: &Route) -> Vec<CongestionLevel> {
        let network = self.store.cached();
        route
            .segments
            .iter()
            .map(|&segment| match self.ledger.get(segment) {
                Some(sample) => sample.level(),
                None => network
                    .as_deref()
                    .and_then(|n| {
                        n.find_edge(segment.from, segment.to)
                            .map(|e| n.edge_congestion_weight[e.index()])
                    })
                    .map(CongestionLevel::from_multiplier)
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Push externally observed samples into the ledger.  The batch is
    /// rejected as a whole if any density is out of range.
    pub fn record_congestion<I>(&self, samples: I) -> EngineResult<usize>
    where
        I: IntoIterator<Item = CongestionSample>,
    {
        Ok(self.ledger.upsert(samples)?)
    }

    // ── Network ───────────────────────────────────────────────────────────

    /// The current network, rebuilt if stale.
    pub fn network(&self) -> EngineResult<Arc<Network>> {
        Ok(self.store.get_network()?)
    }

    /// Replace the network source with `description` and build it now.
    pub fn load_network(&self, description: NetworkDescription) -> EngineResult<Arc<Network>> {
        Ok(self.store.load(description)?)
    }

    /// Drop the cached network; the next query rebuilds it.
    pub fn invalidate_network(&self) {
        self.store.invalidate_cache();
    }

    /// Override the cached congestion weight of one directed edge until the
    /// next rebuild.
    pub fn update_edge_weight(&self, from: NodeId, to: NodeId, weight: f64) -> EngineResult<()> {
        Ok(self.store.update_edge_weight(from, to, weight)?)
    }

    // ── Refresh ───────────────────────────────────────────────────────────

    /// Feed `generator` into the ledger every `interval`, replacing any
    /// running refresh.
    pub fn start_refresh<G: CongestionGenerator>(
        &self,
        interval: Duration,
        generator: G,
    ) -> EngineResult<()> {
        Ok(self.scheduler.start(interval, generator)?)
    }

    /// Refresh every segment of the current network with seeded random
    /// densities at the configured interval.
    pub fn start_synthetic_refresh(&self) -> EngineResult<()> {
        let network = self.store.get_network()?;
        let generator = SyntheticGenerator::new(network.segments(), self.config.congestion_seed);
        info!(
            segments = generator.segment_count(),
            seed = self.config.congestion_seed,
            "starting synthetic congestion"
        );
        self.start_refresh(self.config.refresh_interval(), generator)
    }

    /// Stop the active refresh, if any.  Returns once its thread has exited.
    pub fn stop_refresh(&self) {
        self.scheduler.stop();
    }

    pub fn is_refreshing(&self) -> bool {
        self.scheduler.is_running()
    }
}

// ── EngineBuilder ─────────────────────────────────────────────────────────────

/// Fluent builder for [`RoutingEngine`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                    |
/// |-------------------|--------------------------------------------|
/// | `.description(d)` | `NetworkSource::Sample`                    |
/// | `.ledger(l)`      | A new, empty `CongestionLedger`            |
/// | `.router(r)`      | `AStarRouter` at `config.assumed_speed_kmh` |
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new(EngineConfig::load(None)?)
///     .description(description)
///     .build()?;
/// engine.start_synthetic_refresh()?;
/// let route = engine.find_route(start, destination)?;
/// ```
pub struct EngineBuilder<R: Router = AStarRouter> {
    config: EngineConfig,
    source: NetworkSource,
    ledger: Option<Arc<CongestionLedger>>,
    router: R,
}

impl EngineBuilder<AStarRouter> {
    pub fn new(config: EngineConfig) -> Self {
        let router = AStarRouter::new(config.assumed_speed_kmh);
        Self {
            config,
            source: NetworkSource::Sample,
            ledger: None,
            router,
        }
    }
}

impl<R: Router> EngineBuilder<R> {
    /// Build networks from `description` instead of the sample grid.
    pub fn description(mut self, description: NetworkDescription) -> Self {
        self.source = NetworkSource::Description(description);
        self
    }

    /// Share an existing ledger, e.g. one a telemetry feed already writes to.
    pub fn ledger(mut self, ledger: Arc<CongestionLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Replace the search algorithm.
    pub fn router<R2: Router>(self, router: R2) -> EngineBuilder<R2> {
        EngineBuilder {
            config: self.config,
            source: self.source,
            ledger: self.ledger,
            router,
        }
    }

    /// Validate the configuration and assemble the engine.  The network is
    /// built lazily on first use.
    pub fn build(self) -> EngineResult<RoutingEngine<R>> {
        self.config.validate()?;

        let ledger = self.ledger.unwrap_or_default();
        let store = NetworkStore::new(self.source, self.config.network_ttl());
        let scheduler = RefreshScheduler::new(Arc::clone(&ledger));

        Ok(RoutingEngine {
            config: self.config,
            store,
            ledger,
            scheduler,
            router: self.router,
        })
    }
}
