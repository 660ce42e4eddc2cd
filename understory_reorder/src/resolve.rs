// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping screen-space points to logical grid indices.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::GridMetrics;

/// Resolves `point` to a logical index in the wrapped grid.
///
/// `container` is the container's bounding box in the same space as `point`
/// (typically viewport coordinates). Returns `None` when the point lies
/// outside `container` (edges inclusive) or the layout is not ready.
///
/// The result is `column + row * columns` and is deliberately not clamped:
/// points in the container's padding or past the last item resolve to
/// negative or out-of-range indices, which consumers clamp at use time.
///
/// Callers should pass the center of the dragged element's box rather than
/// the raw pointer position so that partial overlaps resolve stably.
#[must_use]
pub fn resolve_index(point: Point, metrics: &GridMetrics, container: Rect) -> Option<isize> {
    debug_assert!(point.is_finite(), "non-finite drag point {point:?}");
    if !point.is_finite() {
        return None;
    }
    if point.x < container.x0
        || point.x > container.x1
        || point.y < container.y0
        || point.y > container.y1
    {
        return None;
    }
    if !metrics.is_ready() || metrics.item_outer.width <= 0.0 || metrics.item_outer.height <= 0.0
    {
        return None;
    }
    let columns = isize::try_from(metrics.columns).ok()?;
    let local = point - container.origin() - metrics.container_offset;
    let column = (local.x / metrics.item_outer.width).floor();
    let row = (local.y / metrics.item_outer.height).floor();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Both values are floored and bounded by the container extent"
    )]
    let (column, row) = (column as isize, row as isize);
    Some(column.saturating_add(row.saturating_mul(columns)))
}
