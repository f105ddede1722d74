// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::sync::{Mutex, MutexGuard};

use tick::Clock;

use crate::constants::ERR_POISONED_LOCK;
use crate::counts::Counts;
use crate::engine::{Admission, Engine, Outcome};
use crate::error::Error;
use crate::settings::Settings;
use crate::state::State;
use crate::telemetry;

/// A circuit breaker guarding calls to an unreliable operation.
///
/// The breaker is `Send + Sync`; share one instance between threads (usually
/// behind an `Arc`) so that every caller contributes to, and is protected
/// by, the same circuit state. All bookkeeping is serialized by an internal
/// mutex, while the protected operations themselves run outside of it, fully
/// in parallel.
///
/// See the [crate documentation][crate] for the state machine and a usage
/// example.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: Cow<'static, str>,
    clock: Clock,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    settings: Settings,
    engine: Engine,
}

impl CircuitBreaker {
    /// Creates a closed breaker with the given settings.
    ///
    /// The name identifies the breaker in diagnostics and telemetry; it is
    /// not required to be unique. The clock is runtime-specific and must be
    /// provided; tests typically use a controlled clock.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, settings: Settings, clock: &Clock) -> Self {
        let clock = clock.clone();
        let engine = Engine::new(&settings, clock.instant());

        Self {
            name: name.into(),
            clock,
            inner: Mutex::new(Inner { settings, engine }),
        }
    }

    /// The diagnostic name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `work` under the protection of the circuit.
    ///
    /// If the circuit admits the call, `work` runs exactly once and its
    /// result is returned unchanged, with an `Err` wrapped as
    /// [`Error::Operation`] after being counted as a failure. If the circuit
    /// rejects the call, `work` is never invoked, nothing is counted, and
    /// [`Error::Rejected`] is returned.
    ///
    /// Any error is a failure; the breaker does not inspect error kinds.
    /// Callers that only want certain errors to count toward tripping should
    /// filter before handing the call to the breaker.
    ///
    /// # Errors
    ///
    /// [`Error::Rejected`] when the circuit is open or the half-open probe
    /// budget is exhausted; [`Error::Operation`] carrying the error `work`
    /// returned.
    ///
    /// # Panics
    ///
    /// A panic inside `work` is counted as a failure and then propagated
    /// unchanged.
    pub fn execute<T, E, F>(&self, work: F) -> Result<T, Error<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let Some(generation) = self.admit() else {
            return Err(Error::Rejected);
        };

        let guard = CallGuard::new(self, generation);
        let result = work();
        match &result {
            Ok(_) => guard.settle(Outcome::Success),
            Err(_) => guard.settle(Outcome::Failure),
        }

        result.map_err(Error::Operation)
    }

    /// The current circuit state, after catching up elapsed-time transitions.
    #[must_use]
    pub fn state(&self) -> State {
        self.snapshot().0
    }

    /// A snapshot of the outcome counters for the current window.
    #[must_use]
    pub fn counts(&self) -> Counts {
        self.snapshot().1
    }

    /// A snapshot of the active settings.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.locked().settings.clone()
    }

    /// Replaces the configuration, discarding all accumulated state.
    ///
    /// The swap installs a brand-new closed state machine under the same
    /// lock that serializes [`execute`][Self::execute], so no caller can
    /// observe a half-replaced breaker. Counters, an in-progress open
    /// period, and half-open probes are all discarded; settlements of calls
    /// admitted before the swap are dropped.
    pub fn update_settings(&self, settings: Settings) {
        let engine = Engine::new(&settings, self.clock.instant());

        let mut inner = self.locked();
        *inner = Inner { settings, engine };
        drop(inner);

        telemetry::reconfigured(&self.name);
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect(ERR_POISONED_LOCK)
    }

    fn admit(&self) -> Option<u64> {
        // NOTE: time checks happen outside the lock.
        let now = self.clock.instant();

        let mut inner = self.locked();
        let before = inner.engine.state();
        let admission = inner.engine.enter(now);
        let after = inner.engine.state();
        drop(inner);

        if before != after {
            telemetry::transition(&self.name, before, after);
        }

        match admission {
            Admission::Admitted { generation } => Some(generation),
            Admission::Rejected => {
                telemetry::rejected(&self.name, after);
                None
            }
        }
    }

    fn settle(&self, generation: u64, outcome: Outcome) {
        let now = self.clock.instant();

        let mut inner = self.locked();
        let before = inner.engine.state();
        inner.engine.exit(generation, outcome, now);
        let after = inner.engine.state();
        drop(inner);

        if before != after {
            telemetry::transition(&self.name, before, after);
        }
    }

    fn snapshot(&self) -> (State, Counts) {
        let now = self.clock.instant();

        let mut inner = self.locked();
        let before = inner.engine.state();
        inner.engine.sync(now);
        let state = inner.engine.state();
        let counts = inner.engine.counts();
        drop(inner);

        if before != state {
            telemetry::transition(&self.name, before, state);
        }

        (state, counts)
    }
}

/// Settles an admitted call exactly once.
///
/// If the protected operation unwinds instead of returning, the drop settles
/// the call as a failure, so a panicking probe cannot strand the half-open
/// budget. The panic itself keeps propagating.
struct CallGuard<'a> {
    breaker: Option<&'a CircuitBreaker>,
    generation: u64,
}

impl<'a> CallGuard<'a> {
    fn new(breaker: &'a CircuitBreaker, generation: u64) -> Self {
        Self {
            breaker: Some(breaker),
            generation,
        }
    }

    fn settle(mut self, outcome: Outcome) {
        if let Some(breaker) = self.breaker.take() {
            breaker.settle(self.generation, outcome);
        }
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        if let Some(breaker) = self.breaker.take() {
            breaker.settle(self.generation, Outcome::Failure);
        }
    }
}
