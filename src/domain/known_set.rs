//! Known-Set
//!
//! Every mint the monitor has ever observed during this process lifetime.
//! Insert-only: entries are never removed, so a mint can alert at most once.

use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct KnownSet {
    mints: HashSet<String>,
}

impl KnownSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, mint: &str) -> bool {
        self.mints.contains(mint)
    }

    /// Returns true if the mint was not known before
    pub fn insert(&mut self, mint: &str) -> bool {
        if self.mints.contains(mint) {
            return false;
        }
        self.mints.insert(mint.to_string())
    }

    pub fn len(&self) -> usize {
        self.mints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mints.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KnownSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            mints: iter.into_iter().map(Into::into).collect(),
        }
    }
}
