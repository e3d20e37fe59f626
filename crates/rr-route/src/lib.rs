//! `rr-route` — shortest-time routing under live congestion.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`router`] | `Router` trait, `Route`, `find_route`                    |
//! | [`astar`]  | `AStarRouter` — best-first search with haversine heuristic |
//! | [`error`]  | `RouteError`, `RouteResult<T>`                           |
//!
//! # Cost model
//!
//! Traversing an edge costs `distance_km × multiplier`, where the multiplier
//! comes from the congestion ledger when it holds a sample for the segment
//! and from the edge's cached congestion weight otherwise.  Every multiplier
//! is `>= 1.0`, so straight-line distance never overestimates the remaining
//! cost and the A* heuristic stays admissible.

pub mod astar;
pub mod error;
pub mod router;

#[cfg(test)]
mod tests;

pub use astar::{AStarRouter, DEFAULT_SPEED_KMH};
pub use error::{RouteError, RouteResult};
pub use router::{Route, Router, find_route};
