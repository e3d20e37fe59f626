//! A* search over the CSR road graph.
//!
//! # Ordering
//!
//! The frontier is a binary heap keyed on `cost_so_far + heuristic`.  Equal
//! keys pop in insertion order, which together with the network's stable
//! edge order makes the chosen path reproducible.  Once a node is popped it
//! is closed and never expanded again.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use rr_congestion::MultiplierSource;
use rr_core::{EdgeId, NodeId, SegmentId};
use rr_network::Network;

use crate::router::{Route, Router};
use crate::{RouteError, RouteResult};

/// Assumed average emergency-vehicle speed on an open road.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

// ── Frontier entry ────────────────────────────────────────────────────────────

#[derive(Copy, Clone)]
struct Frontier {
    estimate: f64, // cost so far + heuristic
    seq:      u64,
    node:     NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    /// Reversed so `BinaryHeap` (a max-heap) pops the lowest estimate, then
    /// the earliest insertion.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// Best-first search with a straight-line (haversine) heuristic.
///
/// Edge cost is `distance_km × multiplier`.  The heuristic is admissible as
/// long as no edge is shorter than the straight line between its endpoints,
/// which holds for every network built from a description.
#[derive(Clone, Debug)]
pub struct AStarRouter {
    /// Average speed on an uncongested road, km/h.
    pub assumed_speed_kmh: f64,
}

impl AStarRouter {
    pub fn new(assumed_speed_kmh: f64) -> Self {
        Self { assumed_speed_kmh }
    }
}

impl Default for AStarRouter {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_KMH)
    }
}

impl Router for AStarRouter {
    fn route(
        &self,
        network: &Network,
        from: NodeId,
        to: NodeId,
        congestion: &dyn MultiplierSource,
    ) -> RouteResult<Route> {
        if network.is_empty() {
            return Err(RouteError::EmptyNetwork);
        }
        for node in [from, to] {
            if node.index() >= network.node_count() {
                return Err(RouteError::NodeNotFound(node));
            }
        }
        if from == to {
            return Ok(Route::trivial(network, from));
        }

        let edges = astar(network, from, to, congestion)
            .ok_or(RouteError::NoPathFound { from, to })?;
        Ok(self.assemble(network, from, &edges, congestion))
    }
}

impl AStarRouter {
    /// Turn the edge sequence into a [`Route`], summing in path order.
    fn assemble(
        &self,
        network: &Network,
        from: NodeId,
        edges: &[EdgeId],
        congestion: &dyn MultiplierSource,
    ) -> Route {
        let mut nodes = Vec::with_capacity(edges.len() + 1);
        let mut segments = Vec::with_capacity(edges.len());
        let mut total_distance_km = 0.0;
        let mut weighted_cost_km = 0.0;

        nodes.push(from);
        for &e in edges {
            let segment = network.segment(e);
            total_distance_km += network.edge_distance_km[e.index()];
            weighted_cost_km += edge_cost(network, e, segment, congestion);
            nodes.push(segment.to);
            segments.push(segment);
        }

        Route {
            path: nodes.iter().map(|&n| network.position(n)).collect(),
            nodes,
            segments,
            total_distance_km,
            weighted_cost_km,
            estimated_time_min: weighted_cost_km / self.assumed_speed_kmh * 60.0,
        }
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

#[inline]
fn edge_cost(
    network: &Network,
    edge: EdgeId,
    segment: SegmentId,
    congestion: &dyn MultiplierSource,
) -> f64 {
    let multiplier = congestion
        .sample_multiplier(segment)
        .unwrap_or(network.edge_congestion_weight[edge.index()]);
    network.edge_distance_km[edge.index()] * multiplier
}

/// Edges of the cheapest path, or `None` if `to` is unreachable.
fn astar(
    network: &Network,
    from: NodeId,
    to: NodeId,
    congestion: &dyn MultiplierSource,
) -> Option<Vec<EdgeId>> {
    let n = network.node_count();
    let goal = network.position(to);
    let heuristic = |v: NodeId| network.position(v).distance_km(goal);

    // cost[v] = best known cost to reach v.
    let mut cost      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut closed    = vec![false; n];

    let mut seq: u64 = 0;
    let mut heap = BinaryHeap::new();
    cost[from.index()] = 0.0;
    heap.push(Frontier { estimate: heuristic(from), seq, node: from });

    let mut expanded = 0usize;
    while let Some(Frontier { node, .. }) = heap.pop() {
        if closed[node.index()] {
            continue;
        }
        closed[node.index()] = true;
        expanded += 1;

        if node == to {
            debug!(expanded, cost = cost[to.index()], "route found");
            return Some(reconstruct(network, &prev_edge, to));
        }

        let base = cost[node.index()];
        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            if closed[neighbor.index()] {
                continue;
            }
            let segment = SegmentId::new(node, neighbor);
            let candidate = base + edge_cost(network, edge, segment, congestion);

            if candidate < cost[neighbor.index()] {
                cost[neighbor.index()] = candidate;
                prev_edge[neighbor.index()] = edge;
                seq += 1;
                heap.push(Frontier {
                    estimate: candidate + heuristic(neighbor),
                    seq,
                    node: neighbor,
                });
            }
        }
    }

    debug!(expanded, "frontier exhausted");
    None
}

fn reconstruct(network: &Network, prev_edge: &[EdgeId], to: NodeId) -> Vec<EdgeId> {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();
    edges
}
