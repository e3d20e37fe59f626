//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays are sorted by source node and indexed by `EdgeId`.  The
//! sort is stable, so edges of one node keep their insertion order and the
//! search expands neighbours in a reproducible sequence.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds every node as a unit vector on the sphere.
//! Chord distance between unit vectors grows monotonically with great-circle
//! distance, so the R-tree's nearest neighbour is also the haversine-nearest
//! node.  Near-ties are re-ranked by exact haversine distance, then by
//! ascending `NodeId`.
//!
//! A `Network` is immutable once built.  The [`NetworkStore`] replaces it
//! wholesale rather than mutating it in place.
//!
//! [`NetworkStore`]: crate::NetworkStore

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::debug;

use rr_core::{Coordinate, EdgeId, NodeId, SegmentId};

use crate::{NetworkError, NetworkResult};

/// Relative slack on squared chord distance within which R-tree candidates
/// are treated as tied and re-ranked by haversine distance.
const TIE_EPSILON: f64 = 1e-9;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── Edge view ─────────────────────────────────────────────────────────────────

/// Read-only view of one directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub distance_km: f64,
    /// Cached multiplier, `>= 1.0`.  The congestion ledger overrides it at
    /// search time whenever it holds a sample for this segment.
    pub congestion_weight: f64,
}

impl Edge {
    #[inline]
    pub fn segment(&self) -> SegmentId {
        SegmentId::new(self.from, self.to)
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// Do not construct directly; use [`NetworkBuilder`] or
/// [`NetworkDescription::build`](crate::NetworkDescription::build).
#[derive(Clone)]
pub struct Network {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coordinate>,

    /// Identifier of each node in the source description.
    pub node_external_id: Vec<i64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Base length of each edge in kilometres.  Always `> 0`.
    pub edge_distance_km: Vec<f64>,

    /// Cached congestion multiplier of each edge.  Default `1.0`.
    pub edge_congestion_weight: Vec<f64>,

    // ── Indexes ───────────────────────────────────────────────────────────
    external_index: HashMap<i64, NodeId>,
    spatial_idx: RTree<NodeEntry>,

    built_at: Instant,
}

impl Network {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Any snapping or routing request against it fails with
    /// [`NetworkError::EmptyNetwork`].
    pub fn empty() -> Self {
        NetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Time since this network value was built.  Copies made by
    /// [`with_congestion_weight`](Self::with_congestion_weight) keep the
    /// original build time.
    pub fn age(&self) -> Duration {
        self.built_at.elapsed()
    }

    // ── Node lookups ──────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, node: NodeId) -> Coordinate {
        self.node_pos[node.index()]
    }

    pub fn external_id(&self, node: NodeId) -> Option<i64> {
        self.node_external_id.get(node.index()).copied()
    }

    pub fn node_by_external_id(&self, external: i64) -> Option<NodeId> {
        self.external_index.get(&external).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    pub fn edge(&self, id: EdgeId) -> Edge {
        let i = id.index();
        Edge {
            id,
            from: self.edge_from[i],
            to: self.edge_to[i],
            distance_km: self.edge_distance_km[i],
            congestion_weight: self.edge_congestion_weight[i],
        }
    }

    #[inline]
    pub fn segment(&self, id: EdgeId) -> SegmentId {
        SegmentId::new(self.edge_from[id.index()], self.edge_to[id.index()])
    }

    /// First edge from `from` to `to`, if any.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if from.index() >= self.node_count() {
            return None;
        }
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    /// Every directed segment in `EdgeId` order.
    pub fn segments(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.edge_from
            .iter()
            .zip(&self.edge_to)
            .map(|(&from, &to)| SegmentId::new(from, to))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node minimising haversine distance to `point`; ties go to the
    /// lowest `NodeId`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::InvalidCoordinate`] for a non-finite or out-of-range
    /// `point`, [`NetworkError::EmptyNetwork`] when there are no nodes.
    pub fn nearest_node(&self, point: Coordinate) -> NetworkResult<NodeId> {
        if !point.is_valid() {
            return Err(NetworkError::InvalidCoordinate { lat: point.lat, lon: point.lon });
        }
        let query = point.to_unit_vector();
        let mut candidates = self
            .spatial_idx
            .nearest_neighbor_iter(&query)
            .map(|e| (e, e.distance_2(&query)));

        let (first, first_d2) = candidates.next().ok_or(NetworkError::EmptyNetwork)?;
        let limit = first_d2 * (1.0 + TIE_EPSILON) + f64::EPSILON * f64::EPSILON;

        let mut best_id = first.id;
        let mut best_km = point.distance_km(self.position(first.id));
        for (entry, d2) in candidates {
            if d2 > limit {
                break;
            }
            let km = point.distance_km(self.position(entry.id));
            if km < best_km || (km == best_km && entry.id < best_id) {
                best_id = entry.id;
                best_km = km;
            }
        }
        Ok(best_id)
    }

    /// Up to `k` nearest nodes to `point`, nearest first.  Empty for an
    /// invalid `point`.
    pub fn k_nearest_nodes(&self, point: Coordinate, k: usize) -> Vec<NodeId> {
        if !point.is_valid() {
            return Vec::new();
        }
        self.spatial_idx
            .nearest_neighbor_iter(&point.to_unit_vector())
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    // ── Copy-on-write edits ───────────────────────────────────────────────

    /// Return a copy of this network with the cached congestion weight of
    /// the `from → to` edge replaced.  `self` is left untouched.
    pub fn with_congestion_weight(
        &self,
        from: NodeId,
        to: NodeId,
        weight: f64,
    ) -> NetworkResult<Network> {
        if !(weight.is_finite() && weight >= 1.0) {
            return Err(NetworkError::InvalidWeight(weight));
        }
        let edge = self
            .find_edge(from, to)
            .ok_or(NetworkError::EdgeNotFound { from, to })?;
        let mut next = self.clone();
        next.edge_congestion_weight[edge.index()] = weight;
        Ok(next)
    }
}

/// Free-function form of [`Network::nearest_node`].
pub fn nearest_node(point: Coordinate, network: &Network) -> NetworkResult<NodeId> {
    network.nearest_node(point)
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rr_core::Coordinate;
/// use rr_network::NetworkBuilder;
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node(Coordinate::new(28.61, 77.20));
/// let c = b.add_node(Coordinate::new(28.62, 77.20));
/// b.add_road(a, c);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct NetworkBuilder {
    nodes:     Vec<Coordinate>,
    external:  Vec<i64>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:        NodeId,
    to:          NodeId,
    distance_km: f64,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), external: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            external:  Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).  The node's
    /// external id defaults to its index.
    pub fn add_node(&mut self, pos: Coordinate) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.add_node_with_external_id(id.0 as i64, pos)
    }

    /// Add a node carrying the identifier it has in a source description.
    pub fn add_node_with_external_id(&mut self, external: i64, pos: Coordinate) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.external.push(external);
        id
    }

    /// Add a **directed** edge of `distance_km` from `from` to `to`.
    ///
    /// The stored length is never shorter than the straight line between
    /// the endpoints: a smaller or non-finite `distance_km` is raised to it.
    /// An edge whose resulting length is not positive is skipped.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, distance_km: f64) {
        let straight = self.node_pos(from).distance_km(self.node_pos(to));
        let km = if distance_km.is_finite() { distance_km.max(straight) } else { straight };
        if km.is_nan() || km <= 0.0 {
            debug!(%from, %to, distance_km, "skipped zero-length edge");
            return;
        }
        if km != distance_km {
            debug!(%from, %to, distance_km, straight_km = km, "raised edge length to straight-line distance");
        }
        self.raw_edges.push(RawEdge { from, to, distance_km: km });
    }

    /// Add edges in both directions, with length taken from the haversine
    /// distance between the endpoints.
    pub fn add_road(&mut self, a: NodeId, b: NodeId) {
        let km = self.node_pos(a).distance_km(self.node_pos(b));
        self.add_road_with_length(a, b, km);
    }

    /// Add edges in both directions with an explicit length.
    pub fn add_road_with_length(&mut self, a: NodeId, b: NodeId, distance_km: f64) {
        self.add_directed_edge(a, b, distance_km);
        self.add_directed_edge(b, a, distance_km);
    }

    pub fn node_pos(&self, id: NodeId) -> Coordinate {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`Network`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> Network {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort: a node's edges keep their insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:        Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:          Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_distance_km: Vec<f64>    = raw.iter().map(|e| e.distance_km).collect();
        let edge_congestion_weight        = vec![1.0; edge_count];

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let external_index = self
            .external
            .iter()
            .enumerate()
            .map(|(i, &ext)| (ext, NodeId(i as u32)))
            .collect();

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: pos.to_unit_vector(),
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        debug!(nodes = node_count, edges = edge_count, "built road network");

        Network {
            node_pos: self.nodes,
            node_external_id: self.external,
            node_out_start,
            edge_from,
            edge_to,
            edge_distance_km,
            edge_congestion_weight,
            external_index,
            spatial_idx,
            built_at: Instant::now(),
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
