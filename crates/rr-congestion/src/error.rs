use thiserror::Error;

use rr_core::SegmentId;

#[derive(Debug, Error)]
pub enum CongestionError {
    #[error("density {density} for segment {segment} is outside [0, 1]")]
    InvalidDensity { segment: SegmentId, density: f64 },

    #[error("refresh interval must be greater than zero")]
    InvalidInterval,

    #[error("failed to spawn refresh thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type CongestionResult<T> = Result<T, CongestionError>;

/// Failure of a single generator call.  The scheduler logs it and keeps
/// running.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("congestion feed unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Congestion(#[from] CongestionError),
}
