//! Transport timing configuration.

use std::time::Duration;

/// Default bound on every handshake wait.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Default interval between samples of a handshake line.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Default width of the reset pulse.
pub const DEFAULT_RESET_PULSE: Duration = Duration::from_millis(2);

/// Default time the peer needs to boot after reset is released.
pub const DEFAULT_BOOT_DELAY: Duration = Duration::from_millis(5);

/// Configuration for [`NpiTransport`](super::NpiTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Maximum time to wait for the peer-ready line to change.
    pub handshake_timeout: Duration,
    /// Interval between samples while waiting.
    pub poll_interval: Duration,
    /// How long reset is held low.
    pub reset_pulse: Duration,
    /// Delay after reset before the boot indication is read.
    pub boot_delay: Duration,
}

impl TransportConfig {
    /// Create a configuration with default timings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handshake timeout.
    ///
    /// Default: 1 second
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Set the line sampling interval.
    ///
    /// Default: 100 µs
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the reset pulse width. Values below 2 ms are raised to 2 ms.
    pub fn reset_pulse(mut self, pulse: Duration) -> Self {
        self.reset_pulse = pulse.max(DEFAULT_RESET_PULSE);
        self
    }

    /// Set the post-reset boot delay. Values below 5 ms are raised to 5 ms.
    pub fn boot_delay(mut self, delay: Duration) -> Self {
        self.boot_delay = delay.max(DEFAULT_BOOT_DELAY);
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            reset_pulse: DEFAULT_RESET_PULSE,
            boot_delay: DEFAULT_BOOT_DELAY,
        }
    }
}
