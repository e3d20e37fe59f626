//! Unit tests for rr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, SegmentId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn segment_reversal_and_display() {
        let s = SegmentId::new(NodeId(1), NodeId(2));
        assert_eq!(s.reversed(), SegmentId::new(NodeId(2), NodeId(1)));
        assert_ne!(s, s.reversed());
        assert_eq!(s.to_string(), "1->2");
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Coordinate, CoreError, distance_km};

    #[test]
    fn zero_distance() {
        let p = Coordinate::new(28.6139, 77.2090);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn polar_longitudes_coincide() {
        let a = Coordinate::new(90.0, 0.0);
        let b = Coordinate::new(90.0, 10.0);
        assert_ne!(a, b);
        assert!(distance_km(a, b) < 1e-9);
        // Away from the pole a longitude change is a real distance.
        assert!(distance_km(Coordinate::new(89.0, 0.0), Coordinate::new(89.0, 10.0)) > 1.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // ~1 degree of latitude ≈ 111.19 km on a 6371 km sphere
        let a = Coordinate::new(30.0, -88.0);
        let b = Coordinate::new(31.0, -88.0);
        let d = distance_km(a, b);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodal_points() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let half_circumference = std::f64::consts::PI * crate::EARTH_RADIUS_KM;
        assert!((distance_km(a, b) - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn validation_rejects_out_of_range() {
        assert!(Coordinate::try_new(45.0, 90.0).is_ok());
        assert!(Coordinate::try_new(-90.0, 180.0).is_ok());
        assert!(matches!(
            Coordinate::try_new(90.5, 0.0),
            Err(CoreError::InvalidCoordinate { .. })
        ));
        assert!(Coordinate::try_new(0.0, -180.1).is_err());
        assert!(Coordinate::try_new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::try_new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn unit_vector_is_unit_length() {
        let v = Coordinate::new(28.6, 77.2).to_unit_vector();
        let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod geo_props {
    use proptest::prelude::*;

    use crate::{Coordinate, distance_km};

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    proptest! {
        #[test]
        fn symmetric(a in coordinate(), b in coordinate()) {
            prop_assert_eq!(distance_km(a, b), distance_km(b, a));
        }

        #[test]
        fn self_distance_is_zero(a in coordinate()) {
            prop_assert_eq!(distance_km(a, a), 0.0);
        }

        #[test]
        fn bounded_by_half_circumference(a in coordinate(), b in coordinate()) {
            let d = distance_km(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * crate::EARTH_RADIUS_KM + 1e-6);
        }
    }
}

#[cfg(test)]
mod config {
    use std::path::Path;

    use crate::{CoreError, EngineConfig};

    #[test]
    fn defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.network_ttl().as_secs(), 3_600);
        assert_eq!(cfg.refresh_interval().as_millis(), 30_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = EngineConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn zero_interval_rejected() {
        let cfg = EngineConfig { refresh_interval_ms: 0, ..EngineConfig::default() };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn non_positive_speed_rejected() {
        let cfg = EngineConfig { assumed_speed_kmh: 0.0, ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = EngineConfig { assumed_speed_kmh: f64::NAN, ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
