//! `rr-engine` — the public face of the `rapid_route` routing engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`engine`]  | `RoutingEngine`, `EngineBuilder`                        |
//! | [`ranking`] | `Located`, `Ranked`, `rank_by_distance`                 |
//! | [`error`]   | `EngineError`, `ErrorKind`, `EngineResult<T>`           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rr_core::{Coordinate, EngineConfig};
//! use rr_engine::{EngineBuilder, init_tracing};
//!
//! init_tracing();
//! let engine = EngineBuilder::new(EngineConfig::load(None)?).build()?;
//! engine.start_synthetic_refresh()?;
//!
//! let route = engine.find_route(Coordinate::new(28.60, 77.20), Coordinate::new(28.62, 77.22))?;
//! let levels = engine.levels_for_route(&route);
//! engine.stop_refresh();
//! ```

pub mod engine;
pub mod error;
pub mod ranking;


use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use engine::{EngineBuilder, RoutingEngine};
pub use error::{EngineError, EngineResult, ErrorKind};
pub use ranking::{Located, Ranked, rank_by_distance};

/// Install a global `tracing` subscriber: `RUST_LOG`-style filter (default
/// `info`) plus a fmt layer.  Later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}
