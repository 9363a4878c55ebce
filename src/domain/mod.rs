//! Domain Layer - Core discovery policy
//!
//! Pure types and rules with no I/O. Adapters normalize into `TokenRecord`,
//! the `NoveltyFilter` owns the Known-Set, and the `QualificationEngine`
//! decides which novel tokens deserve an alert.

pub mod token;
pub mod known_set;
pub mod novelty_filter;
pub mod qualification;
pub mod risk;

pub use token::{TokenRecord, SourceTag, now_ms, MS_PER_MINUTE};
pub use known_set::KnownSet;
pub use novelty_filter::{NoveltyFilter, NoveltyVerdict, FilterStats};
pub use qualification::{QualificationEngine, Thresholds, Disqualification};
pub use risk::{assess_tracker_risk, TrackerRisk, RiskCount};
