// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Semantic drag events and their subscribers.
//!
//! The engine reports *where* an item should go and nothing else. The list
//! owner subscribes to [`DragEvent`]s and treats [`DragEvent::End`] as the
//! single authoritative signal to reorder its backing storage:
//!
//! ```
//! use understory_reorder::{DragEvent, Listeners};
//!
//! let mut listeners = Listeners::new();
//! let mut seen = Vec::new();
//! let id = listeners.subscribe(move |event: &DragEvent| {
//!     seen.push(event.name());
//!     assert!(seen.len() <= 1);
//! });
//! listeners.emit(&DragEvent::Start { source: 0 });
//! assert!(listeners.unsubscribe(id));
//! listeners.emit(&DragEvent::End { source: 0, destination: Some(2) });
//! ```

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

/// A transition of the drag state machine, as seen by the list owner.
///
/// Destinations are logical grid indices and may be out of range for the
/// list (negative or past the end); clamp them at use time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEvent {
    /// The grabbed item started moving.
    Start {
        /// Index the item was grabbed at.
        source: usize,
    },
    /// The resolved destination changed while dragging.
    Update {
        /// Index the item was grabbed at.
        source: usize,
        /// Index currently under the dragged item, `None` outside the list.
        destination: Option<isize>,
    },
    /// The drop finished settling.
    End {
        /// Index the item was grabbed at.
        source: usize,
        /// Index the item should be moved to.
        destination: Option<isize>,
    },
}

impl DragEvent {
    /// Stable event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "drag-start",
            Self::Update { .. } => "drag-update",
            Self::End { .. } => "drag-end",
        }
    }

    /// Index the dragged item was grabbed at.
    #[must_use]
    pub const fn source(&self) -> usize {
        match *self {
            Self::Start { source }
            | Self::Update { source, .. }
            | Self::End { source, .. } => source,
        }
    }

    /// Destination carried by the event; always `None` for [`DragEvent::Start`].
    #[must_use]
    pub const fn destination(&self) -> Option<isize> {
        match *self {
            Self::Start { .. } => None,
            Self::Update { destination, .. } | Self::End { destination, .. } => destination,
        }
    }
}

/// Identifier returned by [`Listeners::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&DragEvent)>;

/// Fire-and-forget fan-out of [`DragEvent`]s.
///
/// Any number of listeners may attach and detach. Delivery follows
/// subscription order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: SmallVec<[(ListenerId, Callback); 2]>,
}

impl Listeners {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&DragEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Detaches a listener. Returns `false` if it was not attached.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Delivers `event` to every listener.
    pub fn emit(&mut self, event: &DragEvent) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("next_id", &self.next_id)
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn accessors() {
        let e = DragEvent::Update {
            source: 3,
            destination: Some(-1),
        };
        assert_eq!(e.name(), "drag-update");
        assert_eq!(e.source(), 3);
        assert_eq!(e.destination(), Some(-1));
        assert_eq!(DragEvent::Start { source: 1 }.destination(), None);
    }

    #[test]
    fn every_listener_sees_every_event_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        for tag in ['a', 'b'] {
            let log = Rc::clone(&log);
            listeners.subscribe(move |e| log.borrow_mut().push((tag, *e)));
        }
        let start = DragEvent::Start { source: 2 };
        listeners.emit(&start);
        assert_eq!(*log.borrow(), [('a', start), ('b', start)]);
    }

    #[test]
    fn unsubscribed_listeners_stay_quiet() {
        let hits = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::new();
        let id = {
            let hits = Rc::clone(&hits);
            listeners.subscribe(move |_| *hits.borrow_mut() += 1)
        };
        listeners.emit(&DragEvent::Start { source: 0 });
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(&DragEvent::Start { source: 0 });
        assert_eq!(*hits.borrow(), 1);
        assert!(listeners.is_empty());
    }
}
