// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// A snapshot of the outcome counters for the current observation window.
///
/// `requests` is incremented when a call is *admitted*, before its outcome is
/// known; the success and failure counters catch up when the call settles, so
/// `requests == total_successes + total_failures` holds whenever no admitted
/// call is still in flight. Rejected calls are never counted.
///
/// All counters are cleared on every state transition and on the closed-state
/// window rollover. Arithmetic is saturating throughout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    requests: u32,
    total_successes: u32,
    total_failures: u32,
    consecutive_successes: u32,
    consecutive_failures: u32,
}

impl Counts {
    /// Number of calls admitted in the current window.
    #[must_use]
    pub const fn requests(&self) -> u32 {
        self.requests
    }

    /// Number of calls that settled successfully in the current window.
    #[must_use]
    pub const fn total_successes(&self) -> u32 {
        self.total_successes
    }

    /// Number of calls that settled with a failure in the current window.
    #[must_use]
    pub const fn total_failures(&self) -> u32 {
        self.total_failures
    }

    /// Length of the current success streak. Reset to zero by any failure.
    #[must_use]
    pub const fn consecutive_successes(&self) -> u32 {
        self.consecutive_successes
    }

    /// Length of the current failure streak. Reset to zero by any success.
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub(crate) fn record_request(&mut self) {
        self.requests = self.requests.saturating_add(1);
    }

    pub(crate) fn record_success(&mut self) {
        self.total_successes = self.total_successes.saturating_add(1);
        self.consecutive_successes = self.consecutive_successes.saturating_add(1);
        self.consecutive_failures = 0;
    }

    pub(crate) fn record_failure(&mut self) {
        self.total_failures = self.total_failures.saturating_add(1);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.consecutive_successes = 0;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
