//! city_grid — end-to-end walk through the rapid_route engine.
//!
//! Loads the built-in 6×6 sample grid, starts synthetic congestion, ranks
//! nearby hospitals for an incident and routes an ambulance to each one,
//! printing the congestion level of every segment on the way.

mod places;

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use rr_congestion::CongestionLevel;
use rr_core::EngineConfig;
use rr_engine::{EngineBuilder, ErrorKind, RoutingEngine, init_tracing, rank_by_distance};
use rr_route::Route;

use places::{INCIDENT, hospitals};

// ── Constants ─────────────────────────────────────────────────────────────────

const CONFIG_FILE:      &str = "rapid_route.toml";
const REFRESH_MS:       u64  = 250;
const SEARCH_RADIUS_KM: f64  = 5.0;

// ── Output helpers ────────────────────────────────────────────────────────────

fn level_label(level: CongestionLevel) -> &'static str {
    match level {
        CongestionLevel::Low    => "low",
        CongestionLevel::Medium => "MED",
        CongestionLevel::High   => "HIGH",
    }
}

fn print_route(engine: &RoutingEngine, route: &Route) {
    println!(
        "  {:.2} km, {:.1} min ({} segments)",
        route.total_distance_km,
        route.estimated_time_min,
        route.segments.len()
    );
    let levels = engine.levels_for_route(route);
    let strip: Vec<&str> = levels.iter().map(|&l| level_label(l)).collect();
    println!("  congestion: {}", strip.join(" "));
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    // Fast refresh so the demo shows traffic changing between queries.
    let config = EngineConfig {
        refresh_interval_ms: REFRESH_MS,
        ..EngineConfig::load(Some(Path::new(CONFIG_FILE)))?
    };

    println!("=== city_grid — rapid_route ===");
    println!(
        "Speed: {} km/h  |  Refresh: {} ms  |  Seed: {}",
        config.assumed_speed_kmh, config.refresh_interval_ms, config.congestion_seed
    );
    println!();

    // 1. Engine over the sample grid.
    let engine = EngineBuilder::new(config).build()?;
    let network = engine.network()?;
    println!(
        "Road network: {} nodes, {} edges",
        network.node_count(),
        network.edge_count()
    );

    // 2. Synthetic congestion.
    engine.start_synthetic_refresh()?;
    thread::sleep(Duration::from_millis(REFRESH_MS / 2));
    println!("Ledger: {} segments with live congestion", engine.ledger().len());
    println!();

    // 3. Nearby hospitals, nearest first.
    let all = hospitals();
    let nearby = rank_by_distance(INCIDENT, &all, Some(SEARCH_RADIUS_KM));
    println!("Incident at {INCIDENT}; {} hospitals within {SEARCH_RADIUS_KM} km", nearby.len());
    for ranked in &nearby {
        println!("  {:<20} {:>5.2} km", ranked.item.name, ranked.distance_km);
    }
    println!();

    // 4. Route to each.
    let t0 = Instant::now();
    let mut best: Option<(&str, Route)> = None;
    for ranked in &nearby {
        println!("→ {}", ranked.item.name);
        match engine.find_route(INCIDENT, ranked.item.at) {
            Ok(route) => {
                print_route(&engine, &route);
                let faster = best
                    .as_ref()
                    .is_none_or(|(_, b)| route.estimated_time_min < b.estimated_time_min);
                if faster {
                    best = Some((ranked.item.name, route));
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => println!("  unreachable"),
            Err(e) => return Err(e.into()),
        }
    }
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "routing finished");
    println!();

    // 5. Same trip after a few more refreshes.
    if let Some((name, route)) = &best {
        println!("Fastest: {name}");
        thread::sleep(Duration::from_millis(REFRESH_MS * 3));
        let destination = route.path.last().copied().unwrap_or(INCIDENT);
        let again = engine.find_route(INCIDENT, destination)?;
        println!("After traffic update:");
        print_route(&engine, &again);
        println!();
        println!("{}", serde_json::to_string_pretty(&again)?);
    }

    engine.stop_refresh();
    Ok(())
}
