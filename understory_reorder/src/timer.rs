// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual-time scheduled tasks.
//!
//! The engine never owns a native timer. Instead it keeps an ordered set of
//! pending tasks keyed by [`TimerHandle`] and the host drives them by calling
//! `tick(now)` with its own clock. Cancellation is explicit and idempotent:
//! cancelling a handle that already fired or was already cancelled is a no-op
//! that returns `false`.

use core::num::NonZeroU64;

use kurbo::Vec2;
use smallvec::SmallVec;

/// Opaque handle to a scheduled task.
///
/// Handles are never reused within one [`Timers`] instance, so a stale handle
/// can never cancel or match a newer task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(NonZeroU64);

/// Work item carried by a scheduled task.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Task {
    /// Scroll the viewport by the given vector.
    AutoScroll(Vec2),
    /// Finish a drop and return to idle.
    Settle,
    /// Re-measure grid geometry.
    Remeasure,
}

#[derive(Clone, Debug)]
struct Scheduled {
    handle: TimerHandle,
    task: Task,
    due: u64,
    period: Option<u64>,
}

/// Ordered set of pending tasks.
#[derive(Clone, Debug)]
pub struct Timers {
    next_id: u64,
    pending: SmallVec<[Scheduled; 4]>,
}

impl Timers {
    /// Creates an empty task set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: SmallVec::new(),
        }
    }

    fn allocate(&mut self) -> TimerHandle {
        let id = NonZeroU64::new(self.next_id).unwrap_or(NonZeroU64::MIN);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        TimerHandle(id)
    }

    /// Schedules `task` to fire once at `due`.
    pub fn schedule_once(&mut self, task: Task, due: u64) -> TimerHandle {
        let handle = self.allocate();
        self.pending.push(Scheduled {
            handle,
            task,
            due,
            period: None,
        });
        handle
    }

    /// Schedules `task` to fire at `first_due` and then every `period` after.
    ///
    /// A zero `period` is treated as 1 so that [`Timers::pop_due`] always
    /// makes progress.
    pub fn schedule_repeating(&mut self, task: Task, first_due: u64, period: u64) -> TimerHandle {
        let handle = self.allocate();
        self.pending.push(Scheduled {
            handle,
            task,
            due: first_due,
            period: Some(period.max(1)),
        });
        handle
    }

    /// Cancels a task. Returns `true` if it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        self.pending.len() != before
    }

    /// Returns `true` if `handle` is still pending.
    #[must_use]
    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|s| s.handle == handle)
    }

    /// Earliest due time across all pending tasks.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|s| s.due).min()
    }

    /// Removes and returns the earliest task due at or before `now`.
    ///
    /// Repeating tasks stay pending and are re-armed at `due + period`; calling
    /// this in a loop therefore replays every missed period in order. Ties are
    /// broken by scheduling order.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerHandle, Task)> {
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= now)
            .min_by_key(|(_, s)| (s.due, s.handle))?;
        let entry = &mut self.pending[pos];
        let fired = (entry.handle, entry.task);
        match entry.period {
            Some(period) => entry.due = entry.due.saturating_add(period),
            None => {
                self.pending.remove(pos);
            }
        }
        Some(fired)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancels everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}
