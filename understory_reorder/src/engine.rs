// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag-to-reorder state machine.
//!
//! ```text
//!   idle ──down──▶ grabbing ──move──▶ dragging ──up──▶ dropping ──settle──▶ idle
//!                     │                                   │
//!                     └──────────────up──────────▶ idle   └──down (re-grab)──▶ idle ▶ grabbing
//! ```
//!
//! A press that never moves goes straight back to idle and emits nothing.
//! Every timer the engine starts is held as a [`TimerHandle`] and is checked
//! against the current state when it fires, so a late callback from an
//! earlier session can never touch a newer one.

use kurbo::{Insets, Point, Rect, Vec2};

use crate::autoscroll::{AutoScroll, Viewport, scroll_vector};
use crate::events::{DragEvent, ListenerId, Listeners};
use crate::geometry::{BoxModel, GridMetrics};
use crate::logging::{log_debug, log_trace, log_warn};
use crate::resolve::resolve_index;
use crate::shift::ShiftPolicy;
use crate::style::{CubicBezier, ItemStyle, PlaceholderStyle, PointerEvents, Transition};
use crate::timer::{Task, TimerHandle, Timers};
use crate::ReorderConfig;

/// Environment the engine measures and scrolls.
///
/// Rects are in viewport coordinates; sizes and edges in layout units.
pub trait Host {
    /// Box model of the list container.
    fn container_box(&self) -> BoxModel;
    /// Box model of the first item, or `None` when the list is empty.
    fn first_item_box(&self) -> Option<BoxModel>;
    /// Bounding box of the list container.
    fn container_bounds(&self) -> Rect;
    /// Current viewport size, scroll offset and scrollable extent.
    fn viewport(&self) -> Viewport;
    /// Scrolls the viewport by `delta`.
    fn scroll_by(&mut self, delta: Vec2);
}

/// Phase of the drag state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragState {
    /// No session.
    #[default]
    Idle,
    /// An item is pressed but has not moved.
    Grabbing,
    /// The item follows the pointer.
    Dragging,
    /// The item is animating into its destination slot.
    Dropping,
}

impl DragState {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Grabbing => "grabbing",
            Self::Dragging => "dragging",
            Self::Dropping => "dropping",
        }
    }

    /// Returns `true` while the dragged item is out of flow.
    #[must_use]
    pub const fn is_lifted(self) -> bool {
        matches!(self, Self::Dragging | Self::Dropping)
    }
}

/// Where the grabbed item was when it was pressed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrabOrigin {
    /// Viewport position of the item's margin box.
    pub position: Point,
    /// Viewport scroll offset at grab time.
    pub scroll: Vec2,
}

/// State that exists only while the engine is not idle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Static index of the grabbed item.
    pub grabbed_index: usize,
    /// Index under the dragged item; frozen as the destination once dropping.
    pub over_index: Option<isize>,
    /// Where the grab happened.
    pub grab_origin: GrabOrigin,
    /// Border box of the grabbed item at grab time.
    pub item_rect: Rect,
    /// Current visual translation of the grabbed item.
    pub translate: Vec2,
    /// True for the frame right after the item is lifted.
    pub just_lifted: bool,
    settle: Option<TimerHandle>,
}

/// Headless drag-to-reorder engine for a wrapped grid.
///
/// Feed it pointer, scroll and resize notifications plus a monotonic
/// millisecond clock, call [`ReorderEngine::tick`] whenever
/// [`ReorderEngine::next_deadline`] passes, and read per-item styles back with
/// [`ReorderEngine::item_style`]. The list owner learns about reorders only
/// through [`DragEvent`]s.
#[derive(Debug)]
pub struct ReorderEngine {
    config: ReorderConfig,
    state: DragState,
    session: Option<DragSession>,
    metrics: Option<GridMetrics>,
    timers: Timers,
    auto_scroll: AutoScroll,
    remeasure: Option<TimerHandle>,
    listeners: Listeners,
}

impl ReorderEngine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new(config: ReorderConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
            session: None,
            metrics: None,
            timers: Timers::new(),
            auto_scroll: AutoScroll::new(),
            remeasure: None,
            listeners: Listeners::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Current session, `None` when idle.
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Index of the grabbed item.
    #[must_use]
    pub fn grabbed_index(&self) -> Option<usize> {
        self.session.map(|s| s.grabbed_index)
    }

    /// Index currently under the dragged item.
    #[must_use]
    pub fn over_index(&self) -> Option<isize> {
        self.session.and_then(|s| s.over_index)
    }

    /// Last successfully measured grid metrics.
    #[must_use]
    pub const fn metrics(&self) -> Option<&GridMetrics> {
        self.metrics.as_ref()
    }

    /// Auto-scroll vector being applied, `None` when inactive.
    #[must_use]
    pub fn auto_scroll_vector(&self) -> Option<Vec2> {
        self.auto_scroll.vector()
    }

    /// When the next scheduled task is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_due()
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// Attaches an event listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&DragEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Detaches an event listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Re-measures grid geometry.
    ///
    /// On failure (empty list, degenerate item) the previous metrics are kept
    /// and `false` is returned.
    pub fn measure<H: Host + ?Sized>(&mut self, host: &H) -> bool {
        let item = host.first_item_box();
        match GridMetrics::measure(&host.container_box(), item.as_ref()) {
            Ok(metrics) => {
                log_debug!(columns = metrics.columns, "grid measured");
                self.metrics = Some(metrics);
                true
            }
            #[cfg_attr(
                not(feature = "tracing"),
                allow(unused_variables, reason = "Only read by the logging macros")
            )]
            Err(err) => {
                log_warn!(%err, "keeping previous grid metrics");
                false
            }
        }
    }

    /// Notes a viewport resize. Remeasurement runs once resizes stop
    /// arriving for the configured debounce.
    pub fn on_resize(&mut self, now: u64) {
        if let Some(previous) = self.remeasure.take() {
            self.timers.cancel(previous);
        }
        let due = now.saturating_add(self.config.resize_debounce);
        self.remeasure = Some(self.timers.schedule_once(Task::Remeasure, due));
    }

    /// Presses item `index`, whose border box is `item_rect` in viewport space.
    ///
    /// A press during `dropping` completes that drop first. Returns `false`
    /// if a press is already in progress.
    pub fn on_pointer_down<H: Host + ?Sized>(
        &mut self,
        index: usize,
        item_rect: Rect,
        host: &H,
    ) -> bool {
        match self.state {
            DragState::Grabbing | DragState::Dragging => return false,
            DragState::Dropping => self.finish_drop(),
            DragState::Idle => {}
        }
        if self.metrics.is_none() {
            self.measure(host);
        }
        let margin = self.metrics.map_or(Insets::ZERO, |m| m.item_margin);
        let grab_origin = GrabOrigin {
            position: Point::new(item_rect.x0 - margin.x0, item_rect.y0 - margin.y0),
            scroll: host.viewport().scroll,
        };
        self.session = Some(DragSession {
            grabbed_index: index,
            over_index: isize::try_from(index).ok(),
            grab_origin,
            item_rect,
            translate: Vec2::ZERO,
            just_lifted: false,
            settle: None,
        });
        self.set_state(DragState::Grabbing);
        true
    }

    /// Moves the pointer by `delta`.
    ///
    /// The first move after a press lifts the item and emits
    /// [`DragEvent::Start`].
    pub fn on_pointer_move<H: Host + ?Sized>(&mut self, delta: Vec2, host: &H, now: u64) {
        let lifting = match self.state {
            DragState::Grabbing => true,
            DragState::Dragging => false,
            DragState::Idle | DragState::Dropping => return,
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.translate += delta;
        session.just_lifted = lifting;
        let source = session.grabbed_index;
        if lifting {
            // The owner has seen nothing but the source so far; resolve the
            // first target against it.
            session.over_index = isize::try_from(source).ok();
            self.set_state(DragState::Dragging);
            self.emit(DragEvent::Start { source });
        }
        self.follow(host, now);
    }

    /// Notes that the viewport scrolled; the list may have moved under a
    /// stationary pointer.
    pub fn on_scroll<H: Host + ?Sized>(&mut self, host: &H, now: u64) {
        match self.state {
            DragState::Grabbing => self.refresh_over(host),
            DragState::Dragging => {
                if let Some(session) = self.session.as_mut() {
                    session.just_lifted = false;
                }
                self.follow(host, now);
            }
            DragState::Idle | DragState::Dropping => {}
        }
    }

    /// Releases the pointer.
    pub fn on_pointer_up<H: Host + ?Sized>(&mut self, host: &H, now: u64) {
        match self.state {
            DragState::Grabbing => self.teardown(),
            DragState::Dragging => self.drop_item(host, now),
            DragState::Idle | DragState::Dropping => {}
        }
    }

    /// Runs every task due at or before `now`.
    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H, now: u64) {
        while let Some((handle, task)) = self.timers.pop_due(now) {
            match task {
                Task::AutoScroll(vector) => {
                    if self.state != DragState::Dragging
                        || self.auto_scroll.handle() != Some(handle)
                    {
                        log_trace!("discarding stale auto-scroll tick");
                        self.timers.cancel(handle);
                        continue;
                    }
                    if let Some(session) = self.session.as_mut() {
                        session.just_lifted = false;
                    }
                    host.scroll_by(vector);
                    self.follow(&*host, now);
                }
                Task::Settle => {
                    let current = self.session.and_then(|s| s.settle);
                    if self.state == DragState::Dropping && current == Some(handle) {
                        self.finish_drop();
                    } else {
                        log_trace!("discarding stale settle timer");
                    }
                }
                Task::Remeasure => {
                    if self.remeasure == Some(handle) {
                        self.remeasure = None;
                        self.measure(&*host);
                    }
                }
            }
        }
    }

    /// Forcibly ends any session and drops every scheduled task, including a
    /// pending remeasure, without emitting events. Call it on unmount.
    ///
    /// Returns `false` if no session was active.
    pub fn cancel(&mut self) -> bool {
        let active = self.state != DragState::Idle;
        if active {
            self.teardown();
        }
        self.timers.clear();
        self.remeasure = None;
        active
    }

    /// Box of the dragged item in viewport space.
    ///
    /// While grabbing the item is still in flow and moves with the document;
    /// once lifted it is fixed at its grab position plus the translation.
    #[must_use]
    pub fn dragged_bounds(&self, viewport: &Viewport) -> Option<Rect> {
        let session = self.session.as_ref()?;
        match self.state {
            DragState::Idle => None,
            DragState::Grabbing => {
                Some(session.item_rect - (viewport.scroll - session.grab_origin.scroll))
            }
            DragState::Dragging | DragState::Dropping => Some(session.item_rect + session.translate),
        }
    }

    /// Shift decisions for the current frame, `None` unless an item is lifted
    /// and the grid has been measured.
    #[must_use]
    pub fn shift_policy(&self) -> Option<ShiftPolicy> {
        let session = self.session.as_ref()?;
        let metrics = self.metrics.as_ref()?;
        let pivot = match self.state {
            DragState::Dragging => session.over_index,
            DragState::Dropping => session
                .over_index
                .or(isize::try_from(session.grabbed_index).ok()),
            DragState::Idle | DragState::Grabbing => return None,
        };
        Some(ShiftPolicy {
            grabbed: session.grabbed_index,
            pivot,
            columns: metrics.columns,
            pitch: metrics.item_outer,
        })
    }

    /// Style for the item at static index `index`.
    #[must_use]
    pub fn item_style(&self, index: usize) -> ItemStyle {
        let Some(session) = self.session.as_ref().filter(|_| self.state.is_lifted()) else {
            return ItemStyle::in_flow(index);
        };

        if index == session.grabbed_index {
            let transition = if self.state == DragState::Dropping {
                Transition::Transform {
                    duration: self.config.settle_duration,
                    easing: CubicBezier::DROP,
                }
            } else {
                Transition::Unset
            };
            return ItemStyle {
                order: index,
                transform: Some(session.translate),
                transition: Some(transition),
                position: Some(session.grab_origin.position),
                z_index: Some(2),
                pointer_events: Some(PointerEvents::None),
            };
        }

        let mut style = ItemStyle::in_flow(index);
        if !session.just_lifted {
            style.transition = Some(Transition::Transform {
                duration: self.config.shift_duration,
                easing: CubicBezier::SHIFT,
            });
        }
        if let Some(policy) = self.shift_policy() {
            style.transform = policy.offset(index);
            if style.transform.is_some() && policy.wraps(index) {
                style.z_index = Some(1);
            }
        }
        style
    }

    /// Style for the trailing placeholder of a list of `len` items.
    #[must_use]
    pub fn placeholder_style(&self, len: usize) -> PlaceholderStyle {
        let metrics = self.metrics.filter(|_| self.state.is_lifted());
        PlaceholderStyle {
            order: len + 1,
            size: metrics.map(|m| m.item_size),
            margin: metrics.map(|m| m.item_margin),
        }
    }

    fn set_state(&mut self, next: DragState) {
        log_debug!(from = self.state.as_str(), to = next.as_str(), "drag state");
        self.state = next;
    }

    fn emit(&mut self, event: DragEvent) {
        log_trace!(event = event.name(), source = event.source(), "emit");
        self.listeners.emit(&event);
    }

    /// Re-resolves the index under the dragged item and re-evaluates
    /// auto-scroll. Only meaningful while dragging.
    fn follow<H: Host + ?Sized>(&mut self, host: &H, now: u64) {
        self.refresh_over(host);
        let viewport = host.viewport();
        let Some(bounds) = self.dragged_bounds(&viewport) else {
            return;
        };
        let vector = scroll_vector(
            bounds,
            &viewport,
            self.config.scroll_edge_threshold,
            self.config.scroll_step,
        );
        self.auto_scroll
            .update(vector, now, self.config.scroll_interval, &mut self.timers);
    }

    fn refresh_over<H: Host + ?Sized>(&mut self, host: &H) {
        let viewport = host.viewport();
        let Some(bounds) = self.dragged_bounds(&viewport) else {
            return;
        };
        let over = self
            .metrics
            .as_ref()
            .and_then(|m| resolve_index(bounds.center(), m, host.container_bounds()));
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.over_index == over {
            return;
        }
        session.over_index = over;
        let source = session.grabbed_index;
        if self.state == DragState::Dragging {
            self.emit(DragEvent::Update {
                source,
                destination: over,
            });
        }
    }

    fn drop_item<H: Host + ?Sized>(&mut self, host: &H, now: u64) {
        self.auto_scroll.stop(&mut self.timers);
        let container = host.container_bounds();
        let metrics = self.metrics;
        let due = now.saturating_add(self.config.settle_duration);
        let settle = self.timers.schedule_once(Task::Settle, due);
        let Some(session) = self.session.as_mut() else {
            self.timers.cancel(settle);
            return;
        };
        let destination = session
            .over_index
            .or(isize::try_from(session.grabbed_index).ok());
        session.over_index = destination;
        if let Some(cell) = destination.and_then(|d| metrics.and_then(|m| m.cell_origin(d))) {
            // The item is fixed at its grab position, so the translation is
            // the distance from there to the cell's current viewport position.
            session.translate =
                container.origin().to_vec2() + cell - session.item_rect.origin().to_vec2();
        }
        session.just_lifted = false;
        session.settle = Some(settle);
        self.set_state(DragState::Dropping);
    }

    fn finish_drop(&mut self) {
        let Some(session) = self.session else {
            return;
        };
        self.teardown();
        self.emit(DragEvent::End {
            source: session.grabbed_index,
            destination: session.over_index,
        });
    }

    fn teardown(&mut self) {
        self.auto_scroll.stop(&mut self.timers);
        if let Some(settle) = self.session.and_then(|s| s.settle) {
            self.timers.cancel(settle);
        }
        self.session = None;
        self.set_state(DragState::Idle);
    }
}

impl Default for ReorderEngine {
    fn default() -> Self {
        Self::new(ReorderConfig::default())
    }
}
