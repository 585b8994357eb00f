//! Monotonic clocks driving the fixed 30 Hz cadence

use std::thread;
use std::time::{Duration, Instant};

use crate::consts::TICK_MICROS;

/// Time source for the game loop.
///
/// The simulation only ever compares `now_ms` readings, so a clock that never
/// sleeps (see [`ManualClock`]) produces the same rounds as a real one.
pub trait Clock {
    /// Milliseconds since the clock was created
    fn now_ms(&self) -> u64;

    /// Block until the next tick boundary
    fn wait_for_tick(&mut self);

    /// Freeze the whole loop (life-loss pause, fades)
    fn stall(&mut self, ms: u64);
}

/// Wall-clock pacing with `Instant` and `thread::sleep`
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
    next_tick: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            next_tick: now,
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn wait_for_tick(&mut self) {
        let period = Duration::from_micros(TICK_MICROS);
        self.next_tick += period;
        let now = Instant::now();
        if self.next_tick > now {
            thread::sleep(self.next_tick - now);
        } else if now - self.next_tick > period {
            // Fell behind by more than a tick; don't try to catch up
            self.next_tick = now;
        }
    }

    fn stall(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
        self.next_tick = Instant::now();
    }
}

/// Clock that advances exactly one nominal tick per `wait_for_tick`.
/// Used by tests and by the headless binary when `realtime` is off.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.micros += ms * 1000;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.micros / 1000
    }

    fn wait_for_tick(&mut self) {
        self.micros += TICK_MICROS;
    }

    fn stall(&mut self, ms: u64) {
        self.advance_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_ticks() {
        let mut clock = ManualClock::new();
        for _ in 0..30 {
            clock.wait_for_tick();
        }
        assert_eq!(clock.now_ms(), 999);
        clock.stall(1000);
        assert_eq!(clock.now_ms(), 1999);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now_ms();
        clock.wait_for_tick();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(b >= 30);
    }
}
