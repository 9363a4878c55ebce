//! Novelty Filter
//!
//! Drops candidates already in the Known-Set and candidates older than the
//! freshness window. Stale candidates are still marked known so they are not
//! reconsidered on later cycles.

use super::known_set::KnownSet;
use super::token::TokenRecord;

/// Why a candidate did not pass the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoveltyVerdict {
    /// First sighting and fresh
    Accepted,
    /// Mint already known
    AlreadyKnown,
    /// First sighting but older than the freshness window
    Stale,
}

/// Per-call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub accepted: usize,
    pub already_known: usize,
    pub stale: usize,
}

/// Owns the Known-Set and applies the novelty rules
#[derive(Debug)]
pub struct NoveltyFilter {
    known: KnownSet,
    max_age_minutes: u64,
}

impl NoveltyFilter {
    pub fn new(max_age_minutes: u64) -> Self {
        Self::with_known(KnownSet::new(), max_age_minutes)
    }

    pub fn with_known(known: KnownSet, max_age_minutes: u64) -> Self {
        Self {
            known,
            max_age_minutes,
        }
    }

    /// Mark every candidate as known without emitting any of them.
    /// Returns how many mints were newly added.
    pub fn seed(&mut self, candidates: &[TokenRecord]) -> usize {
        candidates
            .iter()
            .filter(|c| self.known.insert(&c.mint))
            .count()
    }

    /// Classify one candidate and update the Known-Set
    pub fn observe(&mut self, candidate: &TokenRecord, now_ms: i64) -> NoveltyVerdict {
        if self.known.contains(&candidate.mint) {
            return NoveltyVerdict::AlreadyKnown;
        }
        self.known.insert(&candidate.mint);
        if candidate.is_stale(now_ms, self.max_age_minutes) {
            NoveltyVerdict::Stale
        } else {
            NoveltyVerdict::Accepted
        }
    }

    /// Filter a candidate list in order, keeping novel and fresh records
    pub fn filter(&mut self, candidates: Vec<TokenRecord>, now_ms: i64) -> (Vec<TokenRecord>, FilterStats) {
        let mut stats = FilterStats::default();
        let mut accepted = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match self.observe(&candidate, now_ms) {
                NoveltyVerdict::Accepted => {
                    stats.accepted += 1;
                    accepted.push(candidate);
                }
                NoveltyVerdict::AlreadyKnown => stats.already_known += 1,
                NoveltyVerdict::Stale => {
                    tracing::debug!("Stale candidate {} marked known", candidate.mint);
                    stats.stale += 1;
                }
            }
        }

        (accepted, stats)
    }

    pub fn known(&self) -> &KnownSet {
        &self.known
    }

    pub fn max_age_minutes(&self) -> u64 {
        self.max_age_minutes
    }
}
