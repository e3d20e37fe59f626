//! Node/way network descriptions and their conversion to a [`Network`].
//!
//! # Format
//!
//! ```json
//! {
//!   "nodes": [{ "id": 1, "lat": 28.61, "lon": 77.20 }],
//!   "ways":  [{ "id": 10, "nodeIds": [1, 2, 3], "tags": { "highway": "primary" } }]
//! }
//! ```
//!
//! # What is built
//!
//! Every described node becomes a network node, including nodes no way
//! touches.  Only ways whose `highway` tag is on the drivable allow-list
//! ([`ROUTABLE_ROAD_TYPES`]) contribute edges; each consecutive pair of refs
//! yields one edge per direction.  One-way tags are ignored.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rr_core::{Coordinate, NodeId};

use crate::network::{Network, NetworkBuilder};
use crate::{NetworkError, NetworkResult};

/// `highway=*` values that produce edges.  Anything else is dropped.
pub const ROUTABLE_ROAD_TYPES: &[&str] = &[
    "motorway",    "motorway_link",
    "trunk",       "trunk_link",
    "primary",     "primary_link",
    "secondary",   "secondary_link",
    "tertiary",    "tertiary_link",
    "residential",
    "service",
    "unclassified",
];

/// `true` if a way tagged `highway=<highway>` is drivable by an emergency
/// vehicle.
pub fn is_routable(highway: &str) -> bool {
    ROUTABLE_ROAD_TYPES.contains(&highway)
}

// ── Description types ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
    #[serde(default)]
    pub ways: Vec<WayDescription>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WayDescription {
    pub id: i64,
    #[serde(rename = "nodeIds", alias = "node_ids")]
    pub node_ids: Vec<i64>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl WayDescription {
    pub fn highway(&self) -> Option<&str> {
        self.tags.get("highway").map(String::as_str)
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

impl NetworkDescription {
    pub fn from_json(json: &str) -> NetworkResult<Self> {
        serde_json::from_str(json).map_err(|e| NetworkError::MalformedDescription(e.to_string()))
    }

    pub fn from_reader<R: Read>(reader: R) -> NetworkResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| NetworkError::MalformedDescription(e.to_string()))
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Validate the description and build a [`Network`] from it.
    ///
    /// # Errors
    ///
    /// [`NetworkError::MalformedDescription`] when a node has an invalid
    /// coordinate, a node id is duplicated, or a retained way references a
    /// node id that is not described.  Ways dropped by the road-type filter
    /// are not inspected.
    pub fn build(&self) -> NetworkResult<Network> {
        let mut builder = NetworkBuilder::with_capacity(self.nodes.len(), self.ways.len() * 4);
        let mut by_external: HashMap<i64, NodeId> = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let pos = Coordinate::try_new(node.lat, node.lon).map_err(|e| {
                NetworkError::MalformedDescription(format!("node {}: {e}", node.id))
            })?;
            if by_external.contains_key(&node.id) {
                return Err(NetworkError::MalformedDescription(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
            let id = builder.add_node_with_external_id(node.id, pos);
            by_external.insert(node.id, id);
        }

        let mut dropped_ways = 0usize;
        let mut skipped_pairs = 0usize;

        for way in &self.ways {
            if !way.highway().is_some_and(is_routable) {
                dropped_ways += 1;
                continue;
            }

            let refs = way
                .node_ids
                .iter()
                .map(|ext| {
                    by_external.get(ext).copied().ok_or_else(|| {
                        NetworkError::MalformedDescription(format!(
                            "way {} references unknown node {ext}",
                            way.id
                        ))
                    })
                })
                .collect::<NetworkResult<Vec<NodeId>>>()?;

            for pair in refs.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let km = builder.node_pos(a).distance_km(builder.node_pos(b));
                // Repeated refs and co-located nodes would give zero-length edges.
                if a == b || km <= 0.0 {
                    skipped_pairs += 1;
                    continue;
                }
                builder.add_road_with_length(a, b, km);
            }
        }

        if skipped_pairs > 0 {
            warn!(skipped_pairs, "skipped zero-length way segments");
        }
        debug!(
            nodes = self.nodes.len(),
            ways = self.ways.len(),
            dropped_ways,
            "building network from description"
        );

        Ok(builder.build())
    }

    // ── Sample network ────────────────────────────────────────────────────

    /// A fixed 6×6 street grid centred on New Delhi, used when no external
    /// description has been supplied.
    ///
    /// Node ids are `1000 + row * 6 + col`.  Rows alternate `primary` and
    /// `residential`; columns are `secondary`.  One `footway` diagonal is
    /// included and dropped by the road-type filter.
    pub fn sample_grid() -> Self {
        const SIZE: i64 = 6;
        const ORIGIN: (f64, f64) = (28.6000, 77.2000);
        const STEP_DEG: f64 = 0.005;

        let id = |row: i64, col: i64| 1_000 + row * SIZE + col;

        let nodes = (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .map(|(row, col)| NodeDescription {
                id: id(row, col),
                lat: ORIGIN.0 + row as f64 * STEP_DEG,
                lon: ORIGIN.1 + col as f64 * STEP_DEG,
            })
            .collect();

        let tagged = |highway: &str| BTreeMap::from([("highway".to_string(), highway.to_string())]);

        let mut ways = Vec::new();
        for row in 0..SIZE {
            let highway = if row % 2 == 0 { "primary" } else { "residential" };
            ways.push(WayDescription {
                id: 1 + row,
                node_ids: (0..SIZE).map(|col| id(row, col)).collect(),
                tags: tagged(highway),
            });
        }
        for col in 0..SIZE {
            ways.push(WayDescription {
                id: 100 + col,
                node_ids: (0..SIZE).map(|row| id(row, col)).collect(),
                tags: tagged("secondary"),
            });
        }
        ways.push(WayDescription {
            id: 900,
            node_ids: (0..SIZE).map(|i| id(i, i)).collect(),
            tags: tagged("footway"),
        });

        Self { nodes, ways }
    }
}
