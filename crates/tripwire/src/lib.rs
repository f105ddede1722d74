// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_logo_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/tripwire/logo.png")]
#![doc(html_favicon_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/tripwire/favicon.ico")]

//! Circuit breaker for guarding calls to unreliable operations.
//!
//! A circuit breaker watches the outcomes of an operation — typically a
//! remote call — and, once failures cross a configured threshold, starts
//! rejecting further calls immediately instead of letting them fail slowly
//! or cascade. Callers get bounded-latency failure detection without
//! hand-rolling protection at every call site.
//!
//! The primary types are:
//!
//! - [`CircuitBreaker`]: wraps caller-supplied units of work and owns the
//!   circuit state.
//! - [`Settings`]: the per-breaker configuration, including the
//!   [`TripPredicate`] that decides when the circuit trips.
//! - [`Counts`]: a read-only snapshot of the outcome counters.
//!
//! The breaker is domain-agnostic: a unit of work is any closure returning
//! `Result`, and any returned error counts as a failure. It is not a retry
//! mechanism, a rate limiter, or a bulkhead — it only observes outcomes and
//! admits or rejects calls.
//!
//! # States and Transitions
//!
//! The circuit operates in three states:
//!
//! - **Closed**: Normal operation. Calls pass through and outcomes
//!   accumulate in [`Counts`]. When the configured
//!   [`ready_to_trip`][Settings::ready_to_trip] predicate fires, the
//!   circuit opens. With an [`interval`][Settings::interval] configured,
//!   the counters are cleared whenever a window of that length passes
//!   without the circuit tripping.
//! - **Open**: Calls are rejected with [`Error::Rejected`] without running.
//!   After [`timeout`][Settings::timeout] has elapsed, the circuit moves to
//!   half-open.
//! - **Half-Open**: Up to [`max_requests`][Settings::max_requests] probe
//!   calls are admitted to test recovery. That many consecutive successes
//!   close the circuit; a single failure — or an attempt to exceed the
//!   probe budget — reopens it and restarts the open timer.
//!
//! ```text
//! ┌────────┐        Trip predicate fires          ┌──────────┐
//! │ Closed │ ────────────────────────────────────▶│   Open   │
//! └────────┘                                      └──────────┘
//!      ▲                                                │
//!      │                                                │
//!      │            ┌────────────────┐                  │
//!      └────────────│   Half-Open    │◀─────────────────┘
//!      Probing      └────────────────┘      Timeout
//!      successful                           elapsed
//! ```
//!
//! Every state transition clears the counters. Elapsed-time transitions are
//! evaluated lazily when the breaker is next observed — there is no
//! background timer, so an idle breaker catches up on the next call or
//! state read.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use tick::Clock;
//! use tripwire::{CircuitBreaker, Error, Settings, TripPredicate};
//!
//! // The clock is runtime-specific and must be provided. Tests and demos
//! // can use a frozen clock; production code injects a runtime-driven one.
//! let clock = Clock::new_frozen();
//!
//! let settings = Settings {
//!     timeout: Duration::from_secs(10),
//!     ready_to_trip: TripPredicate::consecutive_failures(3),
//!     ..Settings::default()
//! };
//! let breaker = CircuitBreaker::new("inventory", settings, &clock);
//!
//! // A failing backend eventually trips the circuit...
//! for _ in 0..3 {
//!     let result = breaker.execute(|| Err::<(), _>("connection refused"));
//!     assert!(result.is_err());
//! }
//!
//! // ...after which calls are rejected without running.
//! let rejected = breaker.execute(|| Ok::<_, &str>("never runs"));
//! assert_eq!(rejected, Err(Error::Rejected));
//! ```
//!
//! # Thread Safety
//!
//! [`CircuitBreaker`] is `Send` and `Sync` and is meant to be shared —
//! typically behind an `Arc` — so that all callers of an operation share
//! one circuit. Admission decisions, outcome recording, and state
//! transitions are linearized by an internal lock; the protected operations
//! themselves run outside the lock, fully in parallel. The breaker imposes
//! no timeout of its own on the work it wraps.
//!
//! # Reconfiguration
//!
//! [`CircuitBreaker::update_settings`] atomically replaces the whole state
//! machine with a freshly closed one, discarding accumulated counters. This
//! deliberately trades continuity for simplicity: there is no way to
//! observe a breaker that is half-old, half-new. It also serves as the
//! recovery path of last resort for a breaker stuck open.
//!
//! # Features
//!
//! - `logs`: Emits structured `tracing` events (`tripwire.breaker.*`) for
//!   state transitions and rejected calls.

mod breaker;
mod constants;
mod counts;
mod engine;
mod error;
mod settings;
mod state;
mod telemetry;

pub use breaker::CircuitBreaker;
pub use counts::Counts;
pub use error::Error;
pub use settings::{Settings, TripPredicate};
pub use state::State;
