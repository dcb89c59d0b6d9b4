//! Bounded tolerance for malformed input.

use log::warn;

use annoload_core::MalformedRecord;

///
/// Number of malformed records a single run may still skip.
///
/// The budget is shared by the whole run, not reset per batch.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipBudget {
    limit: u64,
    skipped: u64,
}

/// Returned by [`SkipBudget::try_consume`] once the budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipLimitExceeded {
    pub limit: u64,
}

impl SkipBudget {
    pub fn new(limit: u64) -> Self {
        Self { limit, skipped: 0 }
    }

    ///
    /// Take one skip from the budget.
    ///
    /// Fails without changing the count when no skips are left, so the record
    /// that exhausts the budget is not counted as skipped.
    ///
    pub fn try_consume(&mut self) -> Result<(), SkipLimitExceeded> {
        if self.skipped >= self.limit {
            return Err(SkipLimitExceeded { limit: self.limit });
        }
        self.skipped += 1;
        Ok(())
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.skipped
    }

    pub fn is_exhausted(&self) -> bool {
        self.skipped >= self.limit
    }
}

///
/// Observer for malformed records.
///
/// Called for every malformed record before it is charged to the
/// [`SkipBudget`], including the one that ends up aborting the run.
///
/// Any `FnMut(&MalformedRecord)` closure is a listener.
///
pub trait SkipListener {
    fn on_skip_in_read(&mut self, record: &MalformedRecord);
}

impl<F> SkipListener for F
where
    F: FnMut(&MalformedRecord),
{
    fn on_skip_in_read(&mut self, record: &MalformedRecord) {
        self(record)
    }
}

/// Logs each skipped record at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSkipListener;

impl SkipListener for LoggingSkipListener {
    fn on_skip_in_read(&mut self, record: &MalformedRecord) {
        warn!(
            "Skipping malformed annotation at line {} ({}): {}",
            record.line_number, record.reason, record.line
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_budget_allows_exactly_limit_skips() {
        let mut budget = SkipBudget::new(2);
        assert!(budget.try_consume().is_ok());
        assert!(budget.try_consume().is_ok());
        assert!(budget.is_exhausted());
        assert_eq!(budget.try_consume(), Err(SkipLimitExceeded { limit: 2 }));
        assert_eq!(budget.skipped(), 2);
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_zero_budget_rejects_first_skip() {
        let mut budget = SkipBudget::new(0);
        assert!(budget.is_exhausted());
        assert!(budget.try_consume().is_err());
        assert_eq!(budget.skipped(), 0);
    }

    #[test]
    fn test_closure_is_a_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |record: &MalformedRecord| seen.push(record.line_number);
            listener.on_skip_in_read(&MalformedRecord::new(7, "bad", "too few columns"));
            listener.on_skip_in_read(&MalformedRecord::new(9, "bad", "too few columns"));
        }
        assert_eq!(seen, vec![7, 9]);
    }
}
