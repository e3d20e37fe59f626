//! Geographic coordinate type and great-circle distance.
//!
//! `Coordinate` uses `f64` latitude/longitude.  Route totals are summed over
//! hundreds of short segments, so single precision would drift visibly in
//! the reported kilometres.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Construct without validation.  Use [`Coordinate::try_new`] for values
    /// arriving from outside the process.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        let c = Self { lat, lon };
        if c.is_valid() {
            Ok(c)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// `true` if latitude is in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in kilometres.
    ///
    /// Symmetric in its arguments and exactly `0.0` for identical points.
    /// At a pole every longitude names the same place, so two coordinates
    /// with `lat == ±90` and different `lon` are zero apart up to rounding.
    pub fn distance_km(self, other: Coordinate) -> f64 {
        // abs() keeps the result bit-identical when the arguments are swapped.
        let d_lat = (other.lat - self.lat).abs().to_radians();
        let d_lon = (other.lon - self.lon).abs().to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Unit vector on the sphere.  Euclidean (chord) distance between unit
    /// vectors is monotonic in great-circle distance, which lets a 3-D
    /// spatial index answer nearest-point queries exactly.
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

/// Free-function form of [`Coordinate::distance_km`].
#[inline]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    a.distance_km(b)
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
