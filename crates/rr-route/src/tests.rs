//! Unit tests for rr-route.
//!
//! All tests use hand-crafted networks near the equator so distances are
//! easy to reason about.

#[cfg(test)]
mod helpers {
    use rr_congestion::CongestionSample;
    use rr_core::{Coordinate, NodeId, SegmentId};
    use rr_network::{Network, NetworkBuilder};

    pub const A: Coordinate = Coordinate::new(0.0, 0.0);
    pub const B: Coordinate = Coordinate::new(0.008, 0.0);
    pub const C: Coordinate = Coordinate::new(0.016, 0.0);

    /// A ↔ B ↔ C, each road exactly 1 km (slightly longer than the
    /// straight line, so the heuristic stays admissible).
    pub fn chain() -> (Network, [NodeId; 3]) {
        let mut b = NetworkBuilder::new();
        let a = b.add_node(A);
        let bb = b.add_node(B);
        let c = b.add_node(C);
        b.add_road_with_length(a, bb, 1.0);
        b.add_road_with_length(bb, c, 1.0);
        (b.build(), [a, bb, c])
    }

    /// Square with two near-equal paths from 0 to 2:
    ///
    /// ```text
    ///   3 ── 2
    ///   │    │
    ///   0 ── 1
    /// ```
    ///
    /// 0→3→2 is marginally shorter because 3→2 runs east-west at a higher
    /// latitude.
    pub fn square() -> (Network, [NodeId; 4]) {
        let mut b = NetworkBuilder::new();
        let n0 = b.add_node(Coordinate::new(0.0, 0.0));
        let n1 = b.add_node(Coordinate::new(0.0, 0.01));
        let n2 = b.add_node(Coordinate::new(0.01, 0.01));
        let n3 = b.add_node(Coordinate::new(0.01, 0.0));
        b.add_road(n0, n1);
        b.add_road(n1, n2);
        b.add_road(n0, n3);
        b.add_road(n3, n2);
        (b.build(), [n0, n1, n2, n3])
    }

    pub fn sample(from: NodeId, to: NodeId, density: f64) -> CongestionSample {
        CongestionSample::new(SegmentId::new(from, to), density).unwrap()
    }
}

// ── Scenarios from the routing contract ───────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use rr_congestion::CongestionLedger;
    use rr_core::{Coordinate, SegmentId};
    use rr_network::{Network, NetworkBuilder};

    use super::helpers::{A, C, chain, sample};
    use crate::{AStarRouter, RouteError, find_route};

    #[test]
    fn chain_without_congestion() {
        let (net, [a, b, c]) = chain();
        let ledger = CongestionLedger::new();
        let route = find_route(&AStarRouter::default(), A, C, &net, &ledger).unwrap();

        assert_eq!(route.nodes, vec![a, b, c]);
        assert_eq!(route.path, vec![net.position(a), net.position(b), net.position(c)]);
        assert_eq!(route.segments, vec![SegmentId::new(a, b), SegmentId::new(b, c)]);
        assert_eq!(route.total_distance_km, 2.0);
        assert_eq!(route.weighted_cost_km, 2.0);
        // 2 km at 40 km/h = 3 minutes
        assert!((route.estimated_time_min - 3.0).abs() < 1e-9);
    }

    #[test]
    fn high_congestion_slows_but_does_not_lengthen() {
        let (net, [a, b, _]) = chain();
        let router = AStarRouter::default();

        let open = find_route(&router, A, C, &net, &CongestionLedger::new()).unwrap();

        let ledger = CongestionLedger::new();
        ledger.upsert([sample(a, b, 0.9)]).unwrap();
        let jammed = find_route(&router, A, C, &net, &ledger).unwrap();

        assert_eq!(jammed.total_distance_km, open.total_distance_km);
        assert!(jammed.estimated_time_min > open.estimated_time_min);
        // 3 km-equivalent + 1 km at 40 km/h = 6 minutes
        assert!((jammed.estimated_time_min - 6.0).abs() < 1e-9);
    }

    #[test]
    fn disconnected_components() {
        let mut b = NetworkBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let bb = b.add_node(Coordinate::new(0.0, 0.01));
        let c = b.add_node(Coordinate::new(1.0, 0.0));
        let d = b.add_node(Coordinate::new(1.0, 0.01));
        b.add_road(a, bb);
        b.add_road(c, d);
        let net = b.build();

        let result = find_route(
            &AStarRouter::default(),
            net.position(a),
            net.position(c),
            &net,
            &CongestionLedger::new(),
        );
        assert!(matches!(result, Err(RouteError::NoPathFound { from, to }) if from == a && to == c));
    }

    #[test]
    fn empty_network() {
        let result = find_route(
            &AStarRouter::default(),
            A,
            C,
            &Network::empty(),
            &CongestionLedger::new(),
        );
        assert!(matches!(result, Err(RouteError::EmptyNetwork)));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let (net, [a, b, c]) = chain();
        let ledger = CongestionLedger::new();
        ledger.upsert([sample(a, b, 0.5), sample(c, b, 0.8)]).unwrap();
        let router = AStarRouter::default();

        let first = find_route(&router, A, C, &net, &ledger).unwrap();
        let second = find_route(&router, A, C, &net, &ledger).unwrap();
        assert_eq!(first, second);
    }
}

// ── Search behaviour ──────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use rr_congestion::{CongestionLedger, LedgerSnapshot};
    use rr_core::{Coordinate, NodeId};
    use rr_network::{NetworkBuilder, NetworkError};

    use super::helpers::{chain, sample, square};
    use crate::{AStarRouter, Route, RouteError, Router, find_route};

    #[test]
    fn picks_shorter_path_on_open_roads() {
        let (net, [n0, _, n2, n3]) = square();
        let route = AStarRouter::default()
            .route(&net, n0, n2, &LedgerSnapshot::default())
            .unwrap();
        assert_eq!(route.nodes, vec![n0, n3, n2]);
    }

    #[test]
    fn detours_around_congestion() {
        let (net, [n0, n1, n2, n3]) = square();
        let snapshot: LedgerSnapshot = [sample(n0, n3, 0.75)].into_iter().collect();
        let route = AStarRouter::default().route(&net, n0, n2, &snapshot).unwrap();
        assert_eq!(route.nodes, vec![n0, n1, n2]);
    }

    #[test]
    fn congestion_is_directional() {
        let (net, [n0, _, n2, n3]) = square();
        // Jam only the opposite direction of 0→3.
        let snapshot: LedgerSnapshot = [sample(n3, n0, 0.95)].into_iter().collect();
        let route = AStarRouter::default().route(&net, n0, n2, &snapshot).unwrap();
        assert_eq!(route.nodes, vec![n0, n3, n2]);
    }

    #[test]
    fn cached_edge_weight_used_without_sample() {
        let (net, [n0, n1, n2, n3]) = square();
        let weighted = net.with_congestion_weight(n0, n3, 3.0).unwrap();
        let router = AStarRouter::default();

        let route = router.route(&weighted, n0, n2, &LedgerSnapshot::default()).unwrap();
        assert_eq!(route.nodes, vec![n0, n1, n2]);

        // A ledger sample overrides the cached weight.
        let snapshot: LedgerSnapshot = [sample(n0, n3, 0.1)].into_iter().collect();
        let route = router.route(&weighted, n0, n2, &snapshot).unwrap();
        assert_eq!(route.nodes, vec![n0, n3, n2]);
    }

    #[test]
    fn same_node_is_trivial() {
        let (net, [a, ..]) = chain();
        let route = AStarRouter::default()
            .route(&net, a, a, &LedgerSnapshot::default())
            .unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.nodes, vec![a]);
        assert_eq!(route.total_distance_km, 0.0);
        assert_eq!(route.estimated_time_min, 0.0);
    }

    #[test]
    fn unknown_node_rejected() {
        let (net, [a, ..]) = chain();
        let result = AStarRouter::default().route(&net, a, NodeId(99), &LedgerSnapshot::default());
        assert!(matches!(result, Err(RouteError::NodeNotFound(NodeId(99)))));
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = NetworkBuilder::new();
        let a = b.add_node(Coordinate::new(0.0, 0.0));
        let c = b.add_node(Coordinate::new(0.0, 0.01));
        b.add_directed_edge(a, c, 1.2);
        let net = b.build();
        let router = AStarRouter::default();
        let none = LedgerSnapshot::default();

        assert!(router.route(&net, a, c, &none).is_ok());
        assert!(matches!(router.route(&net, c, a, &none), Err(RouteError::NoPathFound { .. })));
    }

    #[test]
    fn understated_lengths_cannot_shortcut_search() {
        let mut b = NetworkBuilder::new();
        let s = b.add_node(Coordinate::new(0.0, 0.0));
        let g = b.add_node(Coordinate::new(0.0, 0.02));
        let m = b.add_node(Coordinate::new(0.05, 0.01));
        b.add_road_with_length(s, g, 3.0);
        // Both far shorter than the straight line; stored at straight-line length.
        b.add_road_with_length(s, m, 0.5);
        b.add_road_with_length(m, g, 0.5);
        let net = b.build();

        let via_m = net.position(s).distance_km(net.position(m))
            + net.position(m).distance_km(net.position(g));
        assert!(via_m > 3.0);

        let route = AStarRouter::default()
            .route(&net, s, g, &LedgerSnapshot::default())
            .unwrap();
        assert_eq!(route.nodes, vec![s, g]);
        assert_eq!(route.total_distance_km, 3.0);
    }

    #[test]
    fn search_matches_exhaustive_minimum() {
        let (net, [n0, n1, n2, n3]) = square();
        let snapshot: LedgerSnapshot = [sample(n0, n1, 0.5), sample(n3, n2, 0.8)].into_iter().collect();
        let route = AStarRouter::default().route(&net, n0, n2, &snapshot).unwrap();

        let cost = |a: NodeId, b: NodeId, m: f64| {
            net.edge(net.find_edge(a, b).unwrap()).distance_km * m
        };
        let via_1 = cost(n0, n1, 1.5) + cost(n1, n2, 1.0);
        let via_3 = cost(n0, n3, 1.0) + cost(n3, n2, 3.0);
        assert!((route.weighted_cost_km - via_1.min(via_3)).abs() < 1e-12);
    }

    #[test]
    fn invalid_query_coordinate_is_an_error() {
        let (net, _) = chain();
        let result = find_route(
            &AStarRouter::default(),
            Coordinate::new(f64::NAN, 0.0),
            super::helpers::C,
            &net,
            &CongestionLedger::new(),
        );
        assert!(matches!(
            result,
            Err(RouteError::Network(NetworkError::InvalidCoordinate { .. }))
        ));
    }

    #[test]
    fn speed_scales_time() {
        let (net, [a, _, c]) = chain();
        let none = LedgerSnapshot::default();
        let slow = AStarRouter::new(20.0).route(&net, a, c, &none).unwrap();
        let fast = AStarRouter::new(60.0).route(&net, a, c, &none).unwrap();
        assert!((slow.estimated_time_min - 6.0).abs() < 1e-9);
        assert!((fast.estimated_time_min - 2.0).abs() < 1e-9);
    }

    #[test]
    fn snapping_uses_nearest_nodes() {
        let (net, [_, b, c]) = chain();
        let route = find_route(
            &AStarRouter::default(),
            Coordinate::new(0.0075, 0.0001), // near B
            Coordinate::new(0.0170, 0.0),    // near C
            &net,
            &CongestionLedger::new(),
        )
        .unwrap();
        assert_eq!(route.nodes, vec![b, c]);
        assert_eq!(route.total_distance_km, 1.0);
    }

    #[test]
    fn endpoints_added_only_when_distinct() {
        let (net, [a, b, c]) = chain();
        let route = AStarRouter::default()
            .route(&net, a, c, &LedgerSnapshot::default())
            .unwrap();

        let exact = route.clone().with_endpoints(net.position(a), net.position(c));
        assert_eq!(exact.path.len(), 3);

        let start = Coordinate::new(-0.001, 0.0);
        let dest = Coordinate::new(0.017, 0.0);
        let padded: Route = route.with_endpoints(start, dest);
        assert_eq!(padded.path.len(), 5);
        assert_eq!(padded.path[0], start);
        assert_eq!(padded.path[4], dest);
        assert_eq!(padded.nodes, vec![a, b, c]);
    }
}

// ── Larger grid ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use rr_congestion::{CongestionLedger, CongestionSample};
    use rr_core::SegmentId;
    use rr_network::NetworkDescription;

    use crate::{AStarRouter, find_route};

    #[test]
    fn sample_grid_corner_to_corner() {
        let desc = NetworkDescription::sample_grid();
        let net = desc.build().unwrap();
        let start = net.position(net.node_by_external_id(1_000).unwrap());
        let dest = net.position(net.node_by_external_id(1_035).unwrap());

        let route =
            find_route(&AStarRouter::default(), start, dest, &net, &CongestionLedger::new()).unwrap();
        // Manhattan path: 5 steps north + 5 steps east.
        assert_eq!(route.segments.len(), 10);
        assert_eq!(route.path.first(), Some(&start));
        assert_eq!(route.path.last(), Some(&dest));
        assert!(route.total_distance_km > start.distance_km(dest));
    }

    #[test]
    fn uniform_congestion_scales_time_only() {
        let net = NetworkDescription::sample_grid().build().unwrap();
        let start = net.position(net.node_by_external_id(1_000).unwrap());
        let dest = net.position(net.node_by_external_id(1_035).unwrap());
        let router = AStarRouter::default();

        let open = find_route(&router, start, dest, &net, &CongestionLedger::new()).unwrap();

        let ledger = CongestionLedger::new();
        let samples: Vec<CongestionSample> = net
            .segments()
            .map(|s: SegmentId| CongestionSample::new(s, 0.5).unwrap())
            .collect();
        ledger.upsert(samples).unwrap();
        let medium = find_route(&router, start, dest, &net, &ledger).unwrap();

        assert!((medium.total_distance_km - open.total_distance_km).abs() < 1e-9);
        assert!((medium.estimated_time_min - 1.5 * open.estimated_time_min).abs() < 1e-6);
    }
}
