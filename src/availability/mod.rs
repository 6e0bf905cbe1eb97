//! Per-station, per-day METAR availability.
//!
//! Raw reports are indexed by day and station, folded into hour or half-hour
//! slots, and compared with what each station's operating hours and cadence
//! lead us to expect. The result can then be filtered and rolled up into a
//! monthly summary.

pub mod aggregate;
pub mod filter;
pub mod notes;
pub mod period;
pub mod slot;
pub mod summary;
pub mod types;
pub mod utility;

pub use aggregate::{compute, compute_with_stats};
pub use period::{MonthPeriod, PeriodError};
pub use types::{AvailabilityRecord, CalculationMode, RawReport};
