//! `rr-core` — foundational types for the `rapid_route` routing engine.
//!
//! This crate is a dependency of every other `rr-*` crate.  It intentionally
//! has no `rr-*` dependencies and keeps its external ones small (`thiserror`,
//! `serde`, and `config` for [`EngineConfig::load`]).
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`, `SegmentId`                         |
//! | [`geo`]    | `Coordinate`, haversine `distance_km`                   |
//! | [`config`] | `EngineConfig` — TTL, refresh cadence, assumed speed    |
//! | [`error`]  | `CoreError`, `CoreResult`                               |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::EngineConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Coordinate, EARTH_RADIUS_KM, distance_km};
pub use ids::{EdgeId, NodeId, SegmentId};
