// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Reorder: a headless drag-to-reorder engine for wrapped grids.
//!
//! This crate turns raw pointer input over a grid of congruent items into a
//! small, decoupled event protocol. It owns no DOM, widgets, or timers of its
//! own; hosts report pointer movement, scrolling and resizes, answer a handful
//! of geometry queries through [`Host`], and drive scheduled work by calling
//! [`ReorderEngine::tick`] with their own clock.
//!
//! The pieces, leaves first:
//!
//! - [`GridMetrics`]: item pitch, container inset and column count inferred
//!   from one reference item and the container's box model.
//! - [`resolve_index`]: maps a point (the dragged item's center) to a logical
//!   index in the wrapped grid.
//! - [`scroll_vector`] and [`AutoScroll`]: edge auto-scroll while dragging,
//!   backed by a single repeating task.
//! - [`ReorderEngine`]: the `idle → grabbing → dragging → dropping → idle`
//!   state machine that owns the [`DragSession`].
//! - [`ShiftPolicy`]: per-item make-way offsets that respect row wrapping.
//! - [`DragEvent`] and [`Listeners`]: `drag-start`, `drag-update` and
//!   `drag-end`, delivered to any number of subscribers.
//!
//! The engine only reports *where* an item should go. Reordering the backing
//! list is the owner's job and happens on [`DragEvent::End`].
//!
//! ## Minimal example
//!
//! A 3×2 grid of 200px cells; item 5 is dragged onto cell 1.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Rect, Size, Vec2};
//! use understory_reorder::{BoxModel, DragEvent, Host, ReorderEngine, Viewport};
//!
//! struct Page;
//!
//! impl Host for Page {
//!     fn container_box(&self) -> BoxModel {
//!         BoxModel::new(Size::new(600.0, 400.0))
//!     }
//!     fn first_item_box(&self) -> Option<BoxModel> {
//!         Some(BoxModel::new(Size::new(200.0, 200.0)))
//!     }
//!     fn container_bounds(&self) -> Rect {
//!         Rect::new(0.0, 0.0, 600.0, 400.0)
//!     }
//!     fn viewport(&self) -> Viewport {
//!         Viewport::new(Size::new(600.0, 400.0), Vec2::ZERO, Size::new(600.0, 400.0))
//!     }
//!     fn scroll_by(&mut self, _delta: Vec2) {}
//! }
//!
//! let mut page = Page;
//! let mut engine = ReorderEngine::default();
//! engine.measure(&page);
//!
//! let items = Rc::new(RefCell::new(vec![1, 2, 3, 4, 5, 6]));
//! let owner = Rc::clone(&items);
//! engine.subscribe(move |event| {
//!     if let DragEvent::End { source, destination: Some(dest) } = *event {
//!         let mut items = owner.borrow_mut();
//!         let dest = usize::try_from(dest).unwrap_or(0).min(items.len() - 1);
//!         let item = items.remove(source);
//!         items.insert(dest, item);
//!     }
//! });
//!
//! engine.on_pointer_down(5, Rect::new(400.0, 200.0, 600.0, 400.0), &page);
//! engine.on_pointer_move(Vec2::new(-200.0, -200.0), &page, 16);
//! assert_eq!(engine.over_index(), Some(1));
//! engine.on_pointer_up(&page, 32);
//!
//! // The drop settles after 350ms.
//! engine.tick(&mut page, 32 + 350);
//! assert_eq!(*items.borrow(), [1, 6, 2, 3, 4, 5]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): use `std` floating point via `kurbo/std`.
//! - `libm`: `no_std` floating point via `kurbo/libm`.
//! - `tracing`: log state transitions and scheduled tasks with `tracing`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod autoscroll;
mod config;
mod engine;
mod events;
mod geometry;
mod logging;
mod resolve;
mod shift;
mod style;
mod timer;

pub use autoscroll::{AutoScroll, ScrollRoom, Viewport, scroll_vector};
pub use config::{
    DEFAULT_RESIZE_DEBOUNCE, DEFAULT_SCROLL_EDGE_THRESHOLD, DEFAULT_SCROLL_INTERVAL,
    DEFAULT_SCROLL_STEP, DEFAULT_SETTLE_DURATION, DEFAULT_SHIFT_DURATION, ReorderConfig,
};
pub use engine::{DragSession, DragState, GrabOrigin, Host, ReorderEngine};
pub use events::{DragEvent, ListenerId, Listeners};
pub use geometry::{BoxModel, GridMetrics, MeasureError};
pub use resolve::resolve_index;
pub use shift::ShiftPolicy;
pub use style::{CubicBezier, ItemStyle, PlaceholderStyle, PointerEvents, Transition, Translate};
pub use timer::{Task, TimerHandle, Timers};
