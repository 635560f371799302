// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Jittered exponential backoff for reconnect attempts.

use std::time::Duration;

use rand::Rng;

use huddle_config::model::ReconnectConfig;

/// Tracks the delay for the next reconnect attempt.
///
/// The delay grows geometrically from the base up to the cap. Each
/// returned delay is jittered to between 50% and 100% of the current
/// value so that a fleet of clients dropped by the same outage does
/// not reconnect in lockstep.
#[derive(Debug)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    multiplier: f64,
    current: Duration,
}

impl Backoff {
    pub fn new(config: &ReconnectConfig) -> Self {
        let base = Duration::from_millis(config.base_delay_ms);
        Self {
            base,
            max: Duration::from_millis(config.max_delay_ms),
            multiplier: config.multiplier,
            current: base,
        }
    }

    /// Returns the jittered delay to wait before the next attempt and
    /// advances the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let full = self.current;
        let next = full.mul_f64(self.multiplier);
        self.current = next.min(self.max);

        let jitter = rand::thread_rng().gen_range(0.5..=1.0);
        full.mul_f64(jitter)
    }

    /// Resets the schedule after a successful connection.
    pub fn reset(&mut self) {
        self.current = self.base;
    }
}
