//! Cache configuration.

/// How a message read claims the entries it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimMode {
    /// Mark and fetch in one atomic store call.
    ///
    /// Every returned entry carries this read's `read_ts`, and every entry
    /// marked by this read is returned.
    #[default]
    Atomic,
    /// Mark with `update_all`, then fetch with `find_all` using the same filter.
    ///
    /// Entries written between the two calls can be returned unmarked, and
    /// a failed fetch leaves entries marked but undelivered. Kept for stores
    /// without a combined primitive.
    TwoPhase,
}

/// Configuration for a [`crate::UserCache`].
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Claim strategy for message reads.
    pub claim_mode: ClaimMode,
}

impl CacheConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the claim strategy.
    pub fn with_claim_mode(mut self, mode: ClaimMode) -> Self {
        self.claim_mode = mode;
        self
    }
}
