//! Time source for animation scheduling.
//!
//! Both timer domains (display refresh and wall-clock timers) read time as a
//! [`Timestamp`] supplied by the host, so a [`VirtualClock`] can drive them
//! deterministically in headless runs and tests.

use std::time::{Duration, Instant};

/// A point in time in microseconds since the session epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis_f32(&self) -> f32 {
        self.0 as f32 / 1_000.0
    }

    /// Offset this timestamp by a number of milliseconds.
    pub const fn add_millis(self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis.saturating_mul(1_000)))
    }

    /// Milliseconds elapsed since `earlier` (zero if `earlier` is later).
    pub fn millis_since(&self, earlier: Timestamp) -> f32 {
        self.0.saturating_sub(earlier.0) as f32 / 1_000.0
    }
}

/// A controllable clock.
///
/// In manual mode the position only moves through [`VirtualClock::advance`];
/// in real-time mode [`VirtualClock::update`] adds the wall time elapsed since
/// the previous update.
#[derive(Debug)]
pub struct VirtualClock {
    position: Timestamp,
    last_update: Option<Instant>,
}

impl VirtualClock {
    /// A manual clock starting at zero.
    pub fn manual() -> Self {
        Self {
            position: Timestamp::zero(),
            last_update: None,
        }
    }

    /// A clock that follows wall time from now on.
    pub fn real_time() -> Self {
        Self {
            position: Timestamp::zero(),
            last_update: Some(Instant::now()),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.position
    }

    pub fn is_real_time(&self) -> bool {
        self.last_update.is_some()
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&mut self, delta: Duration) -> Timestamp {
        let micros = delta.as_micros().min(u64::MAX as u128) as u64;
        self.position = Timestamp::from_micros(self.position.as_micros().saturating_add(micros));
        self.position
    }

    /// Move a real-time clock forward by the wall time since the last update.
    ///
    /// No-op for manual clocks.
    pub fn update(&mut self) -> Timestamp {
        if let Some(last) = self.last_update {
            let now = Instant::now();
            self.advance(now - last);
            self.last_update = Some(now);
        }
        self.position
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::manual()
    }
}
