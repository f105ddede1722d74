// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

/// Default number of probe calls admitted while the circuit is half-open.
pub(crate) const DEFAULT_MAX_REQUESTS: u32 = 3;

/// Default length of the closed-state observation window. Counters are
/// cleared when the window elapses without the circuit tripping.
pub(crate) const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Default duration the circuit stays open before admitting probes.
///
/// Also substituted for a zero timeout: a circuit that transitions from
/// open to half-open immediately never actually rejects anything.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of consecutive failures that trips the circuit when no
/// custom trip predicate is configured.
pub(crate) const DEFAULT_TRIP_THRESHOLD: u32 = 5;

pub(crate) const ERR_POISONED_LOCK: &str = "poisoned lock - cannot continue execution because security and privacy guarantees can no longer be upheld";
