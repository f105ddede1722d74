// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trips a circuit breaker against a failing backend, shows the rejection
//! fast path, then waits out the open timer and recovers.
//!
//! Run with:
//!
//! ```text
//! cargo run --example breaker --features logs
//! ```

use std::time::Duration;

use tick::Clock;
use tripwire::{CircuitBreaker, Settings, TripPredicate};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().init();

    let clock = Clock::new_tokio();
    let settings = Settings {
        timeout: Duration::from_millis(200),
        ready_to_trip: TripPredicate::consecutive_failures(3),
        ..Settings::default()
    };
    let breaker = CircuitBreaker::new("payments", settings, &clock);

    // The backend is down; three consecutive failures trip the circuit.
    for attempt in 1..=3 {
        let result = breaker.execute(|| Err::<(), _>("connection refused"));
        println!("attempt {attempt}: {result:?}");
    }
    println!("state: {}", breaker.state());

    // While the circuit is open, calls are rejected without running.
    let rejected = breaker.execute(|| Ok::<_, &str>("never runs"));
    println!("while open: {rejected:?}");

    // Wait out the open timer; the backend has recovered, so three probes
    // close the circuit again.
    clock.delay(Duration::from_millis(250)).await;
    for probe in 1..=3 {
        let result = breaker.execute(|| Ok::<_, &str>("pong"));
        println!("probe {probe}: {result:?} (state: {})", breaker.state());
    }
}
