//! Bounded waits on handshake lines.
//!
//! The peer signals readiness by moving its ready line. Instead of spinning,
//! the waiter samples the line, yields to the runtime for one poll interval,
//! and gives up with [`ZnpError::TransportTimeout`] once the bound is reached.
//! Time comes from `tokio::time`, so tests can pause and advance the clock.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Result, ZnpError};
use crate::hal::{Level, Line, Pins};

/// Samples a line until it reaches a level or the timeout expires.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineWaiter {
    timeout: Duration,
    interval: Duration,
}

impl LineWaiter {
    pub(crate) fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Wait until `line` reads `level`.
    pub(crate) async fn until<P: Pins>(&self, pins: &mut P, line: Line, level: Level) -> Result<()> {
        // Fast path: already there
        if pins.read(line) == level {
            return Ok(());
        }

        let start = Instant::now();
        loop {
            tokio::time::sleep(self.interval).await;

            if pins.read(line) == level {
                return Ok(());
            }

            let waited = start.elapsed();
            if waited >= self.timeout {
                tracing::warn!("Timed out after {:?} waiting for {:?} {:?}", waited, line, level);
                return Err(ZnpError::TransportTimeout {
                    signal: line,
                    waited,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Peer-ready line that goes low after a number of samples.
    struct CountdownPins {
        samples_until_low: usize,
        reads: usize,
    }

    impl Pins for CountdownPins {
        fn set(&mut self, _line: Line) {}

        fn clear(&mut self, _line: Line) {}

        fn read(&mut self, _line: Line) -> Level {
            self.reads += 1;
            if self.reads > self.samples_until_low {
                Level::Low
            } else {
                Level::High
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_level_does_not_sleep() {
        let waiter = LineWaiter::new(Duration::from_millis(10), Duration::from_millis(1));
        let mut pins = CountdownPins {
            samples_until_low: 0,
            reads: 0,
        };

        let start = Instant::now();
        waiter
            .until(&mut pins, Line::PeerReady, Level::Low)
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(pins.reads, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_level_reached_after_samples() {
        let waiter = LineWaiter::new(Duration::from_millis(10), Duration::from_millis(1));
        let mut pins = CountdownPins {
            samples_until_low: 3,
            reads: 0,
        };

        waiter
            .until(&mut pins, Line::PeerReady, Level::Low)
            .await
            .unwrap();
        assert_eq!(pins.reads, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let waiter = LineWaiter::new(Duration::from_millis(10), Duration::from_millis(1));
        let mut pins = CountdownPins {
            samples_until_low: usize::MAX,
            reads: 0,
        };

        let err = waiter
            .until(&mut pins, Line::PeerReady, Level::Low)
            .await
            .unwrap_err();

        match err {
            ZnpError::TransportTimeout { signal, waited } => {
                assert_eq!(signal, Line::PeerReady);
                assert!(waited >= Duration::from_millis(10));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
