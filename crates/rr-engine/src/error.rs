//! Engine-level error type.
//!
//! Wraps every sub-crate error so callers of [`RoutingEngine`] handle one
//! type.  [`EngineError::kind`] collapses the variants into the three
//! outcomes an outer adapter needs to distinguish.
//!
//! [`RoutingEngine`]: crate::RoutingEngine

use thiserror::Error;

use rr_congestion::CongestionError;
use rr_core::CoreError;
use rr_network::NetworkError;
use rr_route::RouteError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Congestion(#[from] CongestionError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Coarse classification of an [`EngineError`], one per HTTP status an
/// adapter returns: `NoPathFound` is `NotFound` (404), `EmptyNetwork` is
/// `InvalidInput` (400) and `MalformedDescription` is `Internal` (500).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was valid but nothing matches it (unreachable
    /// destination, unknown node or edge).
    NotFound,
    /// The request cannot be answered as posed: bad coordinates or
    /// densities, or no network to search.
    InvalidInput,
    /// The engine's own data or runtime failed, e.g. a malformed network
    /// description.
    Internal,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Core(CoreError::InvalidCoordinate { .. }) => ErrorKind::InvalidInput,
            EngineError::Core(_) => ErrorKind::Internal,

            EngineError::Network(e) => network_kind(e),

            EngineError::Congestion(CongestionError::InvalidDensity { .. })
            | EngineError::Congestion(CongestionError::InvalidInterval) => ErrorKind::InvalidInput,
            EngineError::Congestion(CongestionError::Spawn(_)) => ErrorKind::Internal,

            EngineError::Route(RouteError::NoPathFound { .. })
            | EngineError::Route(RouteError::NodeNotFound(_)) => ErrorKind::NotFound,
            EngineError::Route(RouteError::EmptyNetwork) => ErrorKind::InvalidInput,
            EngineError::Route(RouteError::Network(e)) => network_kind(e),
        }
    }
}

fn network_kind(e: &NetworkError) -> ErrorKind {
    match e {
        NetworkError::EmptyNetwork
        | NetworkError::InvalidCoordinate { .. }
        | NetworkError::InvalidWeight(_) => ErrorKind::InvalidInput,
        NetworkError::EdgeNotFound { .. } => ErrorKind::NotFound,
        NetworkError::MalformedDescription(_) => ErrorKind::Internal,
    }
}
