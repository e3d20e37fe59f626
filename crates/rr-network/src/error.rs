//! Network-subsystem error type.

use thiserror::Error;

use rr_core::NodeId;

/// Errors produced by `rr-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("malformed network description: {0}")]
    MalformedDescription(String),

    #[error("network has no nodes")]
    EmptyNetwork,

    #[error("invalid query coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("no edge from {from} to {to}")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("congestion weight must be finite and >= 1.0, got {0}")]
    InvalidWeight(f64),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
