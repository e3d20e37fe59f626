//! Routing trait, route type, and the coordinate-level entry point.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait so a different search (e.g. a
//! contraction hierarchy) can replace [`AStarRouter`] without touching the
//! snapping and snapshot logic in [`find_route`].
//!
//! [`AStarRouter`]: crate::AStarRouter

use serde::{Deserialize, Serialize};
use tracing::debug;

use rr_congestion::{CongestionLedger, MultiplierSource};
use rr_core::{Coordinate, NodeId, SegmentId};
use rr_network::Network;

use crate::{RouteError, RouteResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of one routing query.  Built fresh per call and owned by the
/// caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Resolved path, start to destination.  Begins and ends at the snapped
    /// nodes unless [`with_endpoints`](Self::with_endpoints) added the exact
    /// query coordinates.
    pub path: Vec<Coordinate>,

    /// Network nodes along the path.
    pub nodes: Vec<NodeId>,

    /// Traversed segments in path order; `nodes.len() - 1` entries.
    pub segments: Vec<SegmentId>,

    /// Sum of base edge lengths.  Independent of congestion.
    pub total_distance_km: f64,

    /// Sum of `distance × multiplier` over the traversed edges.
    pub weighted_cost_km: f64,

    /// `weighted_cost_km / assumed speed`, in minutes.  An edge under `High`
    /// congestion contributes three times the time it would under `Low`.
    pub estimated_time_min: f64,
}

impl Route {
    /// A zero-length route that stays at `node`.
    pub fn trivial(network: &Network, node: NodeId) -> Self {
        Self {
            path: vec![network.position(node)],
            nodes: vec![node],
            segments: Vec::new(),
            total_distance_km: 0.0,
            weighted_cost_km: 0.0,
            estimated_time_min: 0.0,
        }
    }

    /// `true` if start and destination snapped to the same node.
    pub fn is_trivial(&self) -> bool {
        self.segments.is_empty()
    }

    /// Prepend `start` and append `destination` to `path` where they differ
    /// from the snapped endpoints.  Distance and time are unchanged.
    pub fn with_endpoints(mut self, start: Coordinate, destination: Coordinate) -> Self {
        if self.path.first() != Some(&start) {
            self.path.insert(0, start);
        }
        if self.path.last() != Some(&destination) {
            self.path.push(destination);
        }
        self
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable node-to-node search.
///
/// Implementations must be `Send + Sync` so one router can serve concurrent
/// queries.
pub trait Router: Send + Sync {
    /// Compute the cheapest route from `from` to `to`, reading multipliers
    /// from `congestion`.
    ///
    /// `from == to` yields a trivial route rather than an error.
    fn route(
        &self,
        network: &Network,
        from: NodeId,
        to: NodeId,
        congestion: &dyn MultiplierSource,
    ) -> RouteResult<Route>;
}

/// Snap `start` and `destination` to their nearest nodes and route between
/// them.
///
/// The ledger is read once, as a [`snapshot`](CongestionLedger::snapshot),
/// before the search starts: for a fixed network and unchanged ledger the
/// result is a pure function of `(start, destination)`.
///
/// # Errors
///
/// [`RouteError::EmptyNetwork`] if the network has no nodes and
/// [`RouteError::NoPathFound`] if the snapped nodes are disconnected.
pub fn find_route<R: Router + ?Sized>(
    router: &R,
    start: Coordinate,
    destination: Coordinate,
    network: &Network,
    ledger: &CongestionLedger,
) -> RouteResult<Route> {
    let from = network.nearest_node(start)?;
    let to = network.nearest_node(destination)?;
    let snapshot = ledger.snapshot();
    debug!(%start, %destination, %from, %to, congested = snapshot.len(), "routing");

    match router.route(network, from, to, &snapshot) {
        Err(RouteError::NoPathFound { from, to }) => {
            debug!(%from, %to, "destination unreachable");
            Err(RouteError::NoPathFound { from, to })
        }
        other => other,
    }
}
