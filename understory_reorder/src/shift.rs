// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Make-way offsets for items around the drop target.
//!
//! Once the grabbed item is lifted out of flow every later item reflows back
//! by one cell. To open a gap at the pivot index, each item whose reflowed
//! slot is at or after the pivot is pushed forward by one cell again:
//!
//! - items after the grabbed one shift iff `i > pivot` (when the pivot is at
//!   or after the grabbed index), since their reflowed slot is `i - 1`;
//! - items before it shift iff `i >= pivot`.
//!
//! A forward push out of a row's last slot cannot move right; it *wraps*
//! instead, travelling back `columns - 1` cells and down one row so the item
//! lands in the first slot of the next row.

use kurbo::{Size, Vec2};

/// Shift decisions for one frame of a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShiftPolicy {
    /// Static index of the grabbed item.
    pub grabbed: usize,
    /// Index the gap opens at, `None` when there is no valid target.
    pub pivot: Option<isize>,
    /// Cells per row.
    pub columns: usize,
    /// Cell pitch.
    pub pitch: Size,
}

impl ShiftPolicy {
    /// Returns `true` if the item at `index` must move to open the gap.
    #[must_use]
    pub fn shifts(&self, index: usize) -> bool {
        if index == self.grabbed {
            return false;
        }
        let Some(pivot) = self.pivot else {
            return false;
        };
        let (Ok(i), Ok(grabbed)) = (isize::try_from(index), isize::try_from(self.grabbed)) else {
            return false;
        };
        if pivot >= grabbed { i > pivot } else { i >= pivot }
    }

    /// Returns `true` if a shift of `index` crosses a row boundary.
    #[must_use]
    pub fn wraps(&self, index: usize) -> bool {
        if index == 0 || self.columns == 0 {
            return false;
        }
        if index > self.grabbed {
            index % self.columns == 0
        } else {
            index % self.columns == self.columns - 1
        }
    }

    /// Visual offset for `index`, or `None` if it stays put.
    #[must_use]
    pub fn offset(&self, index: usize) -> Option<Vec2> {
        if self.columns == 0 || !self.shifts(index) {
            return None;
        }
        if self.wraps(index) {
            let back = (self.columns - 1) as f64 * self.pitch.width;
            Some(Vec2::new(-back, self.pitch.height))
        } else {
            Some(Vec2::new(self.pitch.width, 0.0))
        }
    }

    /// Logical slot `index` visibly occupies this frame.
    ///
    /// The grabbed item occupies the pivot (or its own slot without one).
    #[must_use]
    pub fn visual_slot(&self, index: usize) -> isize {
        let i = isize::try_from(index).unwrap_or(isize::MAX);
        let grabbed = isize::try_from(self.grabbed).unwrap_or(isize::MAX);
        if index == self.grabbed {
            return self.pivot.unwrap_or(grabbed);
        }
        let reflowed = if index > self.grabbed { i - 1 } else { i };
        if self.shifts(index) {
            reflowed + 1
        } else {
            reflowed
        }
    }

    /// Returns `true` if `index` ends up away from its static slot.
    #[must_use]
    pub fn is_displaced(&self, index: usize) -> bool {
        !isize::try_from(index).is_ok_and(|i| self.visual_slot(index) == i)
    }
}
