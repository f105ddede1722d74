// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured logging for circuit events.
//!
//! Compiled to no-ops unless the `logs` feature is enabled, mirroring the
//! event surface of the other resilience crates: WARN when a circuit opens
//! or rejects, INFO when it recovers.

use crate::state::State;

pub(crate) fn transition(name: &str, from: State, to: State) {
    #[cfg(any(feature = "logs", test))]
    {
        match to {
            State::Open => tracing::event!(
                name: "tripwire.breaker.opened",
                tracing::Level::WARN,
                breaker.name = name,
                breaker.from = from.as_str(),
                breaker.state = to.as_str(),
            ),
            State::HalfOpen => tracing::event!(
                name: "tripwire.breaker.half_open",
                tracing::Level::INFO,
                breaker.name = name,
                breaker.from = from.as_str(),
                breaker.state = to.as_str(),
            ),
            State::Closed => tracing::event!(
                name: "tripwire.breaker.closed",
                tracing::Level::INFO,
                breaker.name = name,
                breaker.from = from.as_str(),
                breaker.state = to.as_str(),
            ),
        }
    }

    #[cfg(not(any(feature = "logs", test)))]
    {
        _ = (name, from, to);
    }
}

pub(crate) fn rejected(name: &str, state: State) {
    #[cfg(any(feature = "logs", test))]
    {
        tracing::event!(
            name: "tripwire.breaker.rejected",
            tracing::Level::WARN,
            breaker.name = name,
            breaker.state = state.as_str(),
        );
    }

    #[cfg(not(any(feature = "logs", test)))]
    {
        _ = (name, state);
    }
}

pub(crate) fn reconfigured(name: &str) {
    #[cfg(any(feature = "logs", test))]
    {
        tracing::event!(
            name: "tripwire.breaker.reconfigured",
            tracing::Level::INFO,
            breaker.name = name,
            breaker.state = State::Closed.as_str(),
        );
    }

    #[cfg(not(any(feature = "logs", test)))]
    {
        _ = name;
    }
}
