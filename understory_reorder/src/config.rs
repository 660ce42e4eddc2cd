// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for the reorder engine.

/// Distance in pixels from a viewport edge at which auto-scroll kicks in.
pub const DEFAULT_SCROLL_EDGE_THRESHOLD: f64 = 50.0;
/// Pixels scrolled per auto-scroll interval.
pub const DEFAULT_SCROLL_STEP: f64 = 5.0;
/// Auto-scroll period in milliseconds.
pub const DEFAULT_SCROLL_INTERVAL: u64 = 10;
/// Time in milliseconds a released item is given to reach its slot.
pub const DEFAULT_SETTLE_DURATION: u64 = 350;
/// Duration in milliseconds of the make-way transition on peer items.
pub const DEFAULT_SHIFT_DURATION: u64 = 450;
/// Trailing debounce in milliseconds applied to resize notifications.
pub const DEFAULT_RESIZE_DEBOUNCE: u64 = 500;

/// Engine configuration.
///
/// All durations are milliseconds in the host's clock, all distances are in
/// the host's layout units (typically CSS pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReorderConfig {
    /// Distance from a viewport edge that starts auto-scrolling.
    pub scroll_edge_threshold: f64,
    /// Magnitude of one auto-scroll step.
    pub scroll_step: f64,
    /// Period of the auto-scroll timer.
    pub scroll_interval: u64,
    /// Delay between release and the return to idle.
    pub settle_duration: u64,
    /// Duration of the make-way transition.
    pub shift_duration: u64,
    /// Trailing debounce for resize-driven remeasurement.
    pub resize_debounce: u64,
}

impl ReorderConfig {
    /// Creates a configuration with the default tunables.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scroll_edge_threshold: DEFAULT_SCROLL_EDGE_THRESHOLD,
            scroll_step: DEFAULT_SCROLL_STEP,
            scroll_interval: DEFAULT_SCROLL_INTERVAL,
            settle_duration: DEFAULT_SETTLE_DURATION,
            shift_duration: DEFAULT_SHIFT_DURATION,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
        }
    }

    /// Sets the auto-scroll edge threshold and step.
    #[must_use]
    pub const fn with_scroll(mut self, edge_threshold: f64, step: f64) -> Self {
        self.scroll_edge_threshold = edge_threshold;
        self.scroll_step = step;
        self
    }

    /// Sets the auto-scroll period. A zero period is bumped to 1ms.
    #[must_use]
    pub const fn with_scroll_interval(mut self, interval: u64) -> Self {
        self.scroll_interval = if interval == 0 { 1 } else { interval };
        self
    }

    /// Sets the settle and shift durations.
    #[must_use]
    pub const fn with_durations(mut self, settle: u64, shift: u64) -> Self {
        self.settle_duration = settle;
        self.shift_duration = shift;
        self
    }

    /// Sets the resize debounce.
    #[must_use]
    pub const fn with_resize_debounce(mut self, debounce: u64) -> Self {
        self.resize_debounce = debounce;
        self
    }
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self::new()
    }
}
