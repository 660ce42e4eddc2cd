// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge auto-scrolling while an item is dragged.
//!
//! Every move tick the engine hands the dragged element's box to
//! [`scroll_vector`]. When the box comes within the edge threshold of a
//! viewport edge that still has room to scroll, the matching component of the
//! vector becomes `±step`. [`AutoScroll`] then owns the single repeating timer
//! that applies the vector, restarting it only when the vector changes.

use kurbo::{Rect, Size, Vec2};

use crate::logging::log_trace;
use crate::timer::{Task, TimerHandle, Timers};

bitflags::bitflags! {
    /// Directions in which a viewport can still scroll.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ScrollRoom: u8 {
        /// Content is hidden to the left.
        const LEFT  = 0b0001;
        /// Content is hidden to the right.
        const RIGHT = 0b0010;
        /// Content is hidden above.
        const UP    = 0b0100;
        /// Content is hidden below.
        const DOWN  = 0b1000;
    }
}

/// Scrollable viewport state reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Visible size.
    pub size: Size,
    /// Current scroll offset of the document.
    pub scroll: Vec2,
    /// Total scrollable size of the document.
    pub content: Size,
}

impl Viewport {
    /// Creates a viewport description.
    #[must_use]
    pub const fn new(size: Size, scroll: Vec2, content: Size) -> Self {
        Self {
            size,
            scroll,
            content,
        }
    }

    /// Directions in which further scrolling is possible.
    #[must_use]
    pub fn room(&self) -> ScrollRoom {
        let mut room = ScrollRoom::empty();
        room.set(ScrollRoom::LEFT, self.scroll.x > 0.0);
        room.set(
            ScrollRoom::RIGHT,
            self.scroll.x + self.size.width < self.content.width,
        );
        room.set(ScrollRoom::UP, self.scroll.y > 0.0);
        room.set(
            ScrollRoom::DOWN,
            self.scroll.y + self.size.height < self.content.height,
        );
        room
    }
}

/// Computes the auto-scroll velocity for a dragged box in viewport coordinates.
///
/// Leading edges win over trailing edges on the same axis, so a box larger
/// than the viewport scrolls backward first.
#[must_use]
pub fn scroll_vector(dragged: Rect, viewport: &Viewport, edge_threshold: f64, step: f64) -> Vec2 {
    let room = viewport.room();
    let axis = |lead: f64, trail: f64, extent: f64, back: ScrollRoom, fwd: ScrollRoom| {
        if lead < edge_threshold && room.contains(back) {
            -step
        } else if extent - trail < edge_threshold && room.contains(fwd) {
            step
        } else {
            0.0
        }
    };
    Vec2::new(
        axis(
            dragged.x0,
            dragged.x1,
            viewport.size.width,
            ScrollRoom::LEFT,
            ScrollRoom::RIGHT,
        ),
        axis(
            dragged.y0,
            dragged.y1,
            viewport.size.height,
            ScrollRoom::UP,
            ScrollRoom::DOWN,
        ),
    )
}

/// Owner of the repeating auto-scroll timer.
///
/// At most one timer is active at a time. It is cancelled before a new one
/// starts, when the vector drops to zero, and by [`AutoScroll::stop`].
#[derive(Clone, Debug, Default)]
pub struct AutoScroll {
    active: Option<(Vec2, TimerHandle)>,
}

impl AutoScroll {
    /// Creates an idle controller.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// The vector currently being applied, if any.
    #[must_use]
    pub fn vector(&self) -> Option<Vec2> {
        self.active.map(|(v, _)| v)
    }

    /// Handle of the running timer, if any.
    #[must_use]
    pub fn handle(&self) -> Option<TimerHandle> {
        self.active.map(|(_, h)| h)
    }

    /// Applies a freshly computed vector.
    ///
    /// Restarts the timer if the vector changed, stops it if the vector is
    /// zero, and otherwise leaves the running timer untouched.
    pub fn update(&mut self, vector: Vec2, now: u64, interval: u64, timers: &mut Timers) {
        if self.vector() == Some(vector) {
            return;
        }
        self.stop(timers);
        if vector == Vec2::ZERO {
            return;
        }
        let handle =
            timers.schedule_repeating(Task::AutoScroll(vector), now.saturating_add(interval), interval);
        log_trace!(x = vector.x, y = vector.y, "auto-scroll started");
        self.active = Some((vector, handle));
    }

    /// Cancels the running timer. Safe to call when nothing is running.
    pub fn stop(&mut self, timers: &mut Timers) {
        if let Some((_, handle)) = self.active.take() {
            timers.cancel(handle);
            log_trace!("auto-scroll stopped");
        }
    }
}
