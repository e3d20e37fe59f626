//! Routing error type.

use thiserror::Error;

use rr_core::NodeId;
use rr_network::NetworkError;

#[derive(Debug, Error)]
pub enum RouteError {
    /// The destination is unreachable from the start.  An expected outcome
    /// on a disconnected network, not a system failure.
    #[error("no route from {from} to {to}")]
    NoPathFound { from: NodeId, to: NodeId },

    #[error("network has no nodes")]
    EmptyNetwork,

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error(transparent)]
    Network(NetworkError),
}

impl From<NetworkError> for RouteError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::EmptyNetwork => RouteError::EmptyNetwork,
            other => RouteError::Network(other),
        }
    }
}

pub type RouteResult<T> = Result<T, RouteError>;
