//! `rr-network` — road network, description loading, and the network cache.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`network`]     | `Network` (CSR + R-tree), `NetworkBuilder`, `Edge`         |
//! | [`description`] | `NetworkDescription` (node/way JSON), road-type allow-list |
//! | [`store`]       | `NetworkStore` — TTL cache with copy-and-swap rebuilds     |
//! | [`error`]       | `NetworkError`, `NetworkResult<T>`                         |

pub mod description;
pub mod error;
pub mod network;
pub mod store;


pub use description::{NetworkDescription, NodeDescription, WayDescription, is_routable};
pub use error::{NetworkError, NetworkResult};
pub use network::{Edge, Network, NetworkBuilder, nearest_node};
pub use store::{NetworkSource, NetworkStore};
