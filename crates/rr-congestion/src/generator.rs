//! Congestion sample producers.
//!
//! A live telemetry feed and the synthetic generator plug into the
//! [`RefreshScheduler`](crate::RefreshScheduler) through the same trait.

use std::ops::RangeInclusive;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use rr_core::SegmentId;

use crate::{CongestionSample, GeneratorError};

/// Produces a batch of samples each time the scheduler ticks.
///
/// Implementations run on the scheduler's background thread, hence
/// `Send + 'static`.  An `Err` skips that tick only.
pub trait CongestionGenerator: Send + 'static {
    fn generate(&mut self) -> Result<Vec<CongestionSample>, GeneratorError>;
}

// ── SyntheticGenerator ────────────────────────────────────────────────────────

/// Random densities for a fixed set of segments, for demos and tests.
///
/// Deterministic for a given seed: two generators built with the same seed
/// and segment list produce identical density sequences.
pub struct SyntheticGenerator {
    segments: Vec<SegmentId>,
    rng:      SmallRng,
    density:  RangeInclusive<f64>,
}

impl SyntheticGenerator {
    pub fn new<I>(segments: I, seed: u64) -> Self
    where
        I: IntoIterator<Item = SegmentId>,
    {
        Self {
            segments: segments.into_iter().collect(),
            rng:      SmallRng::seed_from_u64(seed),
            density:  0.0..=1.0,
        }
    }

    /// Restrict sampled densities to `range`, clamped into `[0, 1]`.
    ///
    /// `0.6..=1.0` simulates rush hour; `0.0..=0.25` a quiet night.
    pub fn with_density_range(mut self, range: RangeInclusive<f64>) -> Self {
        let lo = range.start().clamp(0.0, 1.0);
        let hi = range.end().clamp(lo, 1.0);
        self.density = lo..=hi;
        self
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl CongestionGenerator for SyntheticGenerator {
    fn generate(&mut self) -> Result<Vec<CongestionSample>, GeneratorError> {
        let range = self.density.clone();
        self.segments
            .iter()
            .map(|&segment| {
                let density = self.rng.gen_range(range.clone());
                CongestionSample::new(segment, density).map_err(GeneratorError::from)
            })
            .collect()
    }
}

// ── FnGenerator ───────────────────────────────────────────────────────────────

/// Adapter turning a closure into a [`CongestionGenerator`].  Build it with
/// [`from_fn`].
pub struct FnGenerator<F>(F);

/// Wrap `f` as a generator.
///
/// ```
/// use rr_congestion::{CongestionGenerator, from_fn};
///
/// let mut g = from_fn(|| Ok(Vec::new()));
/// assert!(g.generate().unwrap().is_empty());
/// ```
pub fn from_fn<F>(f: F) -> FnGenerator<F>
where
    F: FnMut() -> Result<Vec<CongestionSample>, GeneratorError> + Send + 'static,
{
    FnGenerator(f)
}

impl<F> CongestionGenerator for FnGenerator<F>
where
    F: FnMut() -> Result<Vec<CongestionSample>, GeneratorError> + Send + 'static,
{
    fn generate(&mut self) -> Result<Vec<CongestionSample>, GeneratorError> {
        (self.0)()
    }
}
