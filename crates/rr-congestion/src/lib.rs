//! `rr-congestion` — live traffic state and its periodic refresh.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`level`]     | `CongestionLevel`, `classify`, `multiplier_for`            |
//! | [`ledger`]    | `CongestionSample`, `CongestionLedger`, `LedgerSnapshot`   |
//! | [`generator`] | `CongestionGenerator` trait, `SyntheticGenerator`, `from_fn` |
//! | [`scheduler`] | `RefreshScheduler` — cancellable background refresh thread |
//! | [`error`]     | `CongestionError`, `GeneratorError`                        |
//!
//! # Data flow
//!
//! ```text
//! generator ──(every interval)──▶ RefreshScheduler ──upsert──▶ CongestionLedger
//!                                                                  │
//!                                       route search ◀──snapshot───┘
//! ```

pub mod error;
pub mod generator;
pub mod ledger;
pub mod level;
pub mod scheduler;


pub use error::{CongestionError, CongestionResult, GeneratorError};
pub use generator::{CongestionGenerator, FnGenerator, SyntheticGenerator, from_fn};
pub use ledger::{CongestionLedger, CongestionSample, LedgerSnapshot, MultiplierSource};
pub use level::{CongestionLevel, classify, multiplier_for};
pub use scheduler::{DEFAULT_REFRESH_INTERVAL, RefreshScheduler};
