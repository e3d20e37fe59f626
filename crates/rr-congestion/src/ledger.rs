//! Per-segment congestion samples.
//!
//! # Consistency
//!
//! The ledger is a sharded concurrent map (`DashMap`).  A read of one
//! segment observes either the previous sample or the complete new one.
//! There is no atomicity across segments: a reader may see some segments of
//! an in-progress [`upsert`](CongestionLedger::upsert) and not others.
//!
//! Writes are last-write-wins by arrival order.  `observed_at` is carried
//! for display only and never used to reject an older sample.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use rr_core::SegmentId;

use crate::level::{CongestionLevel, classify};
use crate::{CongestionError, CongestionResult};

// ── CongestionSample ──────────────────────────────────────────────────────────

/// One traffic density reading for one directed segment.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CongestionSample {
    pub segment: SegmentId,
    /// Traffic density in `[0, 1]`.
    pub density: f64,
    pub observed_at: DateTime<Utc>,
}

impl CongestionSample {
    /// A sample observed now.
    pub fn new(segment: SegmentId, density: f64) -> CongestionResult<Self> {
        Self::observed(segment, density, Utc::now())
    }

    pub fn observed(
        segment: SegmentId,
        density: f64,
        observed_at: DateTime<Utc>,
    ) -> CongestionResult<Self> {
        let sample = Self { segment, density, observed_at };
        sample.validate()?;
        Ok(sample)
    }

    pub fn validate(&self) -> CongestionResult<()> {
        if (0.0..=1.0).contains(&self.density) {
            Ok(())
        } else {
            Err(CongestionError::InvalidDensity {
                segment: self.segment,
                density: self.density,
            })
        }
    }

    #[inline]
    pub fn level(&self) -> CongestionLevel {
        classify(self.density)
    }
}

// ── MultiplierSource ──────────────────────────────────────────────────────────

/// Anything that can report a congestion multiplier per segment.
pub trait MultiplierSource {
    /// Multiplier from a sample, or `None` if the segment has no sample.
    fn sample_multiplier(&self, segment: SegmentId) -> Option<f64>;

    /// Multiplier for `segment`, defaulting to the open-road `1.0`.
    fn multiplier_for(&self, segment: SegmentId) -> f64 {
        self.sample_multiplier(segment).unwrap_or(1.0)
    }
}

// ── CongestionLedger ──────────────────────────────────────────────────────────

/// Current congestion sample per segment.  Share it as
/// `Arc<CongestionLedger>`; every method takes `&self`.
#[derive(Default)]
pub struct CongestionLedger {
    samples: DashMap<SegmentId, CongestionSample>,
}

impl CongestionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the sample of every segment in `samples`.
    ///
    /// The whole batch is validated first; if any density is out of range
    /// nothing is written.  Within a batch, a later sample for the same
    /// segment wins.  Returns the number of samples applied.
    pub fn upsert<I>(&self, samples: I) -> CongestionResult<usize>
    where
        I: IntoIterator<Item = CongestionSample>,
    {
        let batch: Vec<CongestionSample> = samples.into_iter().collect();
        for sample in &batch {
            sample.validate()?;
        }
        let applied = batch.len();
        for sample in batch {
            self.samples.insert(sample.segment, sample);
        }
        Ok(applied)
    }

    pub fn get(&self, segment: SegmentId) -> Option<CongestionSample> {
        self.samples.get(&segment).map(|s| *s)
    }

    /// Level of `segment`; `Low` when no sample exists.
    pub fn level_for(&self, segment: SegmentId) -> CongestionLevel {
        self.get(segment).map(|s| s.level()).unwrap_or_default()
    }

    /// One level per segment, in the order given.
    pub fn levels_for_route<I>(&self, segments: I) -> Vec<CongestionLevel>
    where
        I: IntoIterator<Item = SegmentId>,
    {
        segments.into_iter().map(|s| self.level_for(s)).collect()
    }

    /// Copy every segment's current level into an immutable snapshot.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let levels = self
            .samples
            .iter()
            .map(|entry| (*entry.key(), entry.value().level()))
            .collect();
        LedgerSnapshot { levels }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&self) {
        self.samples.clear();
    }
}

impl MultiplierSource for CongestionLedger {
    fn sample_multiplier(&self, segment: SegmentId) -> Option<f64> {
        self.get(segment).map(|s| s.level().multiplier())
    }
}

// ── LedgerSnapshot ────────────────────────────────────────────────────────────

/// Frozen copy of the ledger's levels.  A route search takes one at its
/// start so that every edge it relaxes sees the same congestion state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerSnapshot {
    levels: HashMap<SegmentId, CongestionLevel>,
}

impl LedgerSnapshot {
    pub fn level_for(&self, segment: SegmentId) -> CongestionLevel {
        self.levels.get(&segment).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl MultiplierSource for LedgerSnapshot {
    fn sample_multiplier(&self, segment: SegmentId) -> Option<f64> {
        self.levels.get(&segment).map(|l| l.multiplier())
    }
}

impl FromIterator<CongestionSample> for LedgerSnapshot {
    fn from_iter<T: IntoIterator<Item = CongestionSample>>(iter: T) -> Self {
        let levels = iter.into_iter().map(|s| (s.segment, s.level())).collect();
        LedgerSnapshot { levels }
    }
}
