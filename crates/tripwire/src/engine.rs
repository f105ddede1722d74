// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::{Duration, Instant};

use crate::counts::Counts;
use crate::settings::{Settings, TripPredicate};
use crate::state::State;

/// Result of asking the engine to admit a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// The call may proceed. Its outcome must be settled against this
    /// generation.
    Admitted { generation: u64 },
    Rejected,
}

/// Classified outcome of an admitted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Success,
    Failure,
}

/// The circuit state machine.
///
/// The engine is purely reactive: it never spawns timers. Elapsed-time
/// transitions (window rollover, open → half-open) are applied lazily by
/// [`sync`][Self::sync] whenever the machine is observed, with the current
/// instant passed in by the owning breaker.
///
/// Every transition and every window rollover bumps the generation and
/// clears the counters. A settlement whose generation no longer matches
/// belongs to an episode that has already ended and is discarded, which is
/// what keeps admission bookkeeping exact while outcomes arrive from
/// arbitrarily delayed concurrent calls.
#[derive(Debug)]
pub(crate) struct Engine {
    phase: Phase,
    generation: u64,
    max_requests: u32,
    interval: Option<Duration>,
    timeout: Duration,
    trip: TripPredicate,
}

#[derive(Debug)]
enum Phase {
    Closed {
        counts: Counts,
        window_ends: Option<Instant>,
    },
    Open {
        until: Instant,
    },
    HalfOpen {
        counts: Counts,
    },
}

impl Engine {
    pub fn new(settings: &Settings, now: Instant) -> Self {
        let interval = settings.effective_interval();

        Self {
            phase: Phase::Closed {
                counts: Counts::default(),
                window_ends: interval.map(|interval| now + interval),
            },
            generation: 0,
            max_requests: settings.effective_max_requests(),
            interval,
            timeout: settings.effective_timeout(),
            trip: settings.ready_to_trip.clone(),
        }
    }

    /// Applies the transitions driven purely by elapsed time: the
    /// closed-state window rollover and the open → half-open promotion.
    pub fn sync(&mut self, now: Instant) {
        match &mut self.phase {
            Phase::Closed { counts, window_ends } => {
                if let Some(ends) = *window_ends
                    && now >= ends
                {
                    counts.clear();
                    *window_ends = self.interval.map(|interval| now + interval);
                    self.generation += 1;
                }
            }
            Phase::Open { until } => {
                if now >= *until {
                    self.phase = Phase::HalfOpen { counts: Counts::default() };
                    self.generation += 1;
                }
            }
            Phase::HalfOpen { .. } => {}
        }
    }

    /// Decides whether a call may proceed, recording the request marker for
    /// admitted calls. Admission and budget accounting are a single step;
    /// the outcome is settled separately via [`exit`][Self::exit].
    pub fn enter(&mut self, now: Instant) -> Admission {
        self.sync(now);

        match &mut self.phase {
            Phase::Closed { counts, .. } => {
                counts.record_request();
                Admission::Admitted { generation: self.generation }
            }
            Phase::Open { .. } => Admission::Rejected,
            Phase::HalfOpen { counts } => {
                if counts.requests() < self.max_requests {
                    counts.record_request();
                    Admission::Admitted { generation: self.generation }
                } else {
                    // Attempting to exceed the probe budget abandons the
                    // half-open episode and restarts the open timer.
                    self.phase = Phase::Open { until: now + self.timeout };
                    self.generation += 1;
                    Admission::Rejected
                }
            }
        }
    }

    /// Settles the outcome of a previously admitted call and evaluates the
    /// transition rules.
    pub fn exit(&mut self, generation: u64, outcome: Outcome, now: Instant) {
        self.sync(now);

        if generation != self.generation {
            // The admitting episode ended while the call was in flight
            // (transition or window rollover). The result belongs to counters
            // that no longer exist.
            return;
        }

        match &mut self.phase {
            Phase::Closed { counts, .. } => {
                match outcome {
                    Outcome::Success => counts.record_success(),
                    Outcome::Failure => counts.record_failure(),
                }

                if self.trip.ready_to_trip(counts) {
                    self.phase = Phase::Open { until: now + self.timeout };
                    self.generation += 1;
                }
            }
            Phase::Open { .. } => {
                // Every path into Open bumps the generation, so a matching
                // settlement cannot observe it.
            }
            Phase::HalfOpen { counts } => match outcome {
                Outcome::Success => {
                    counts.record_success();
                    if counts.consecutive_successes() >= self.max_requests {
                        self.phase = Phase::Closed {
                            counts: Counts::default(),
                            window_ends: self.interval.map(|interval| now + interval),
                        };
                        self.generation += 1;
                    }
                }
                Outcome::Failure => {
                    self.phase = Phase::Open { until: now + self.timeout };
                    self.generation += 1;
                }
            },
        }
    }

    pub fn state(&self) -> State {
        match self.phase {
            Phase::Closed { .. } => State::Closed,
            Phase::Open { .. } => State::Open,
            Phase::HalfOpen { .. } => State::HalfOpen,
        }
    }

    pub fn counts(&self) -> Counts {
        match &self.phase {
            Phase::Closed { counts, .. } | Phase::HalfOpen { counts } => *counts,
            Phase::Open { .. } => Counts::default(),
        }
    }
}
