// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Display;

/// The observable state of a circuit breaker.
///
/// The breaker cycles between these states for its entire lifetime; there is
/// no terminal state. See the [crate documentation][crate] for the full
/// transition diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Normal operation. Calls pass through and outcomes are tracked.
    Closed,

    /// The circuit is broken. Calls are rejected without running.
    Open,

    /// Recovery is being tested. A bounded number of probe calls are
    /// admitted to assess the health of the protected operation.
    HalfOpen,
}

impl State {
    /// Stable textual form of the state, suitable for telemetry attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::fmt::Debug;
    use std::hash::Hash;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(State: Send, Sync, Copy, Hash, Display, Debug, PartialEq, Eq);

    #[test]
    fn as_str_is_stable() {
        assert_eq!(State::Closed.as_str(), "closed");
        assert_eq!(State::Open.as_str(), "open");
        assert_eq!(State::HalfOpen.as_str(), "half_open");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(State::HalfOpen.to_string(), "half_open");
    }
}
