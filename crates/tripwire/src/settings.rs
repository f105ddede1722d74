// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::Counts;
use crate::constants::{DEFAULT_INTERVAL, DEFAULT_MAX_REQUESTS, DEFAULT_TIMEOUT, DEFAULT_TRIP_THRESHOLD};

/// Configuration for a [`CircuitBreaker`][crate::CircuitBreaker].
///
/// A settings value is immutable once handed to a breaker; to change the
/// configuration of a live breaker, build a new value and pass it to
/// [`update_settings`][crate::CircuitBreaker::update_settings].
///
/// Degenerate values are normalized rather than rejected, since everything
/// else is valid by construction (durations cannot be negative):
///
/// - `max_requests == 0` behaves as `1` — the half-open state always needs
///   at least one probe to make progress.
/// - A zero `timeout` is replaced by the default of 30 seconds — a circuit
///   that leaves the open state immediately never rejects anything.
/// - A zero `interval` behaves as `None` — the closed-state window never
///   rolls over.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use tripwire::{Settings, TripPredicate};
///
/// let settings = Settings {
///     max_requests: 1,
///     timeout: Duration::from_secs(10),
///     ready_to_trip: TripPredicate::consecutive_failures(3),
///     ..Settings::default()
/// };
/// # let _settings = settings;
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    /// Number of probe calls admitted while the circuit is half-open.
    ///
    /// The circuit closes again once this many *consecutive* successes have
    /// been recorded in the half-open state.
    pub max_requests: u32,

    /// Length of the closed-state observation window. When the window
    /// elapses without the circuit tripping, the counters are cleared and a
    /// new window starts. `None` keeps one window for the life of the
    /// closed state.
    pub interval: Option<Duration>,

    /// How long the circuit stays open before probing for recovery.
    pub timeout: Duration,

    /// Decides when the closed circuit trips, evaluated against the current
    /// [`Counts`] after every settled call.
    pub ready_to_trip: TripPredicate,
}

impl Default for Settings {
    /// The default profile: 3 half-open probes, a 60 second closed-state
    /// window, a 30 second open timeout, and a trip after 5 consecutive
    /// failures.
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            interval: Some(DEFAULT_INTERVAL),
            timeout: DEFAULT_TIMEOUT,
            ready_to_trip: TripPredicate::default(),
        }
    }
}

impl Settings {
    pub(crate) fn effective_max_requests(&self) -> u32 {
        self.max_requests.max(1)
    }

    pub(crate) fn effective_interval(&self) -> Option<Duration> {
        self.interval.filter(|interval| !interval.is_zero())
    }

    pub(crate) fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() { DEFAULT_TIMEOUT } else { self.timeout }
    }
}

/// Decides when a closed circuit trips.
///
/// The predicate receives the current [`Counts`] after each settled call and
/// returns `true` to open the circuit. It runs under the breaker's internal
/// lock, so it should be cheap and must not call back into the breaker.
///
/// # Examples
///
/// ```
/// use tripwire::TripPredicate;
///
/// // Trip once a fifth of the window's calls have failed.
/// let predicate = TripPredicate::new(|counts| {
///     counts.requests() >= 10 && counts.total_failures() * 5 >= counts.requests()
/// });
/// # let _predicate = predicate;
/// ```
#[derive(Clone)]
pub struct TripPredicate(Arc<dyn Fn(&Counts) -> bool + Send + Sync>);

impl TripPredicate {
    /// Wraps an arbitrary predicate over the outcome counters.
    #[must_use]
    pub fn new(predicate: impl Fn(&Counts) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Trips once the failure streak reaches `threshold`.
    #[must_use]
    pub fn consecutive_failures(threshold: u32) -> Self {
        Self::new(move |counts| counts.consecutive_failures() >= threshold)
    }

    pub(crate) fn ready_to_trip(&self, counts: &Counts) -> bool {
        (self.0)(counts)
    }
}

impl Default for TripPredicate {
    /// Trips after 5 consecutive failures.
    fn default() -> Self {
        Self::consecutive_failures(DEFAULT_TRIP_THRESHOLD)
    }
}

impl Debug for TripPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TripPredicate")
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Settings: Send, Sync, Clone, Debug);

    #[test]
    fn default_profile() {
        let settings = Settings::default();

        assert_eq!(settings.max_requests, 3);
        assert_eq!(settings.interval, Some(Duration::from_secs(60)));
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn zero_max_requests_normalized_to_one() {
        let settings = Settings {
            max_requests: 0,
            ..Settings::default()
        };

        assert_eq!(settings.effective_max_requests(), 1);
    }

    #[test]
    fn zero_interval_disables_rollover() {
        let settings = Settings {
            interval: Some(Duration::ZERO),
            ..Settings::default()
        };

        assert_eq!(settings.effective_interval(), None);
    }

    #[test]
    fn zero_timeout_normalized_to_default() {
        let settings = Settings {
            timeout: Duration::ZERO,
            ..Settings::default()
        };

        assert_eq!(settings.effective_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn default_predicate_trips_on_fifth_consecutive_failure() {
        let predicate = TripPredicate::default();
        let mut counts = Counts::default();

        for _ in 0..4 {
            counts.record_request();
            counts.record_failure();
        }
        assert!(!predicate.ready_to_trip(&counts));

        counts.record_request();
        counts.record_failure();
        assert!(predicate.ready_to_trip(&counts));
    }

    #[test]
    fn intervening_success_resets_default_predicate() {
        let predicate = TripPredicate::default();
        let mut counts = Counts::default();

        for _ in 0..4 {
            counts.record_failure();
        }
        counts.record_success();
        for _ in 0..4 {
            counts.record_failure();
        }

        assert!(!predicate.ready_to_trip(&counts));
    }

    #[test]
    fn custom_predicate_sees_counts() {
        let predicate = TripPredicate::new(|counts| counts.requests() >= 2);
        let mut counts = Counts::default();

        counts.record_request();
        assert!(!predicate.ready_to_trip(&counts));

        counts.record_request();
        assert!(predicate.ready_to_trip(&counts));
    }
}
