//! Result of a single-document update.

use serde::{Deserialize, Serialize};

/// Counts reported by the store for one `update_one` call.
///
/// Not-found is not an error: it is a successful call with `matched == 0`.
/// Under the natural-key uniqueness constraint `matched` is 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Documents that satisfied the filter
    pub matched: u64,
    /// Documents whose stored values actually changed
    pub modified: u64,
}

impl UpdateOutcome {
    /// Build an outcome from raw store counts.
    pub fn new(matched: u64, modified: u64) -> Self {
        Self { matched, modified }
    }

    /// No document matched the filter.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// True when no document matched the filter.
    pub fn is_not_found(&self) -> bool {
        self.matched == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_matches_is_not_found() {
        assert!(UpdateOutcome::not_found().is_not_found());
        assert!(UpdateOutcome::new(0, 0).is_not_found());
    }

    #[test]
    fn matched_without_modification_is_found() {
        // Re-applying identical values matches but modifies nothing
        let outcome = UpdateOutcome::new(1, 0);
        assert!(!outcome.is_not_found());
    }
}
