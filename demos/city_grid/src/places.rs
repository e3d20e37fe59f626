//! Fixed incident and hospital locations on the sample grid.

use rr_core::Coordinate;
use rr_engine::Located;

pub struct Hospital {
    pub name: &'static str,
    pub at:   Coordinate,
}

impl Located for Hospital {
    fn location(&self) -> Coordinate {
        self.at
    }
}

/// Reported incident, slightly off the street grid.
pub const INCIDENT: Coordinate = Coordinate::new(28.6012, 77.2031);

pub fn hospitals() -> Vec<Hospital> {
    vec![
        Hospital { name: "North General", at: Coordinate::new(28.6248, 77.2102) },
        Hospital { name: "Ring Road Trauma", at: Coordinate::new(28.6131, 77.2243) },
        Hospital { name: "Old Fort Clinic", at: Coordinate::new(28.6049, 77.2152) },
        Hospital { name: "Riverside Medical", at: Coordinate::new(28.6520, 77.2600) },
    ]
}
