//! Straight-line distance ranking for facility lookups (nearest hospital,
//! nearest depot).
//!
//! Uses only the haversine distance; the road network is not consulted.

use serde::Serialize;

use rr_core::Coordinate;

/// Anything with a fixed position.
pub trait Located {
    fn location(&self) -> Coordinate;
}

impl Located for Coordinate {
    fn location(&self) -> Coordinate {
        *self
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn location(&self) -> Coordinate {
        (**self).location()
    }
}

/// An item paired with its distance from the ranking origin.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub item:        T,
    pub distance_km: f64,
}

/// Sort `items` by great-circle distance from `origin`, nearest first.
///
/// Items at equal distance keep their input order.  With `radius_km` set,
/// items farther than the radius are dropped; an item exactly on the radius
/// is kept.
pub fn rank_by_distance<T, I>(origin: Coordinate, items: I, radius_km: Option<f64>) -> Vec<Ranked<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .map(|item| {
            let distance_km = origin.distance_km(item.location());
            Ranked { item, distance_km }
        })
        .filter(|r| radius_km.is_none_or(|max| r.distance_km <= max))
        .collect();
    // Stable sort keeps input order among equal distances.
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}
