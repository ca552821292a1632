//! Periodic location tracking with a single live tick schedule.
//!
//! Everything runs on the caller's thread: the host polls with its own clock and moves
//! the player when a tick fires. Starting always replaces the previous schedule, so two
//! live ticks can never coexist, and stopping guarantees that no further tick fires.

use crate::types::LatLng;

/// Push-style supplier of location samples.
pub trait LocationSource {
    /// The next sample, or `None` when no fix is available right now.
    fn sample(&mut self) -> Option<LatLng>;
}

/// Identifies one tick schedule. Handles from a cancelled schedule never become current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Schedule {
    handle: TickHandle,
    next_due_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tracker {
    interval_ms: u64,
    schedule: Option<Schedule>,
    next_generation: u64,
}

impl Tracker {
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms: interval_ms.max(1), schedule: None, next_generation: 0 }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_active(&self) -> bool {
        self.schedule.is_some()
    }

    /// Cancels any running schedule and starts a new one whose first tick is due now.
    pub fn start(&mut self, now_ms: u64) -> TickHandle {
        if let Some(previous) = self.schedule.take() {
            log::debug!("tracking restarted; cancelled tick schedule {:?}", previous.handle);
        }
        let handle = TickHandle(self.next_generation);
        self.next_generation += 1;
        self.schedule = Some(Schedule { handle, next_due_ms: now_ms });
        handle
    }

    /// Returns whether a schedule was running.
    pub fn stop(&mut self) -> bool {
        self.schedule.take().is_some()
    }

    pub fn is_current(&self, handle: TickHandle) -> bool {
        self.schedule.is_some_and(|schedule| schedule.handle == handle)
    }

    /// Fires at most one tick per call. Missed intervals collapse into a single tick.
    pub fn poll(&mut self, now_ms: u64) -> Option<TickHandle> {
        let schedule = self.schedule.as_mut()?;
        if now_ms < schedule.next_due_ms {
            return None;
        }
        let behind = (now_ms - schedule.next_due_ms) / self.interval_ms;
        schedule.next_due_ms += (behind + 1) * self.interval_ms;
        Some(schedule.handle)
    }

    /// Milliseconds until the next tick is due, if tracking.
    pub fn time_until_due(&self, now_ms: u64) -> Option<u64> {
        self.schedule.map(|schedule| schedule.next_due_ms.saturating_sub(now_ms))
    }
}
