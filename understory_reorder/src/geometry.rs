// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid geometry inferred from measured boxes.
//!
//! All items in a reorderable grid are assumed congruent, so one reference
//! item plus the container's box model is enough to recover the per-cell
//! pitch, where cell `(0, 0)` sits inside the container, and how many columns
//! fit before the flow wraps.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Insets, Size, Vec2};

/// Measured CSS-style box model of one element.
///
/// `size` is the border box (content + padding + border), which is what a
/// layout engine reports as the element's rendered width and height. Edges
/// use [`Insets`] with `x0` = left, `y0` = top, `x1` = right, `y1` = bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxModel {
    /// Border-box size.
    pub size: Size,
    /// Margin edges.
    pub margin: Insets,
    /// Padding edges.
    pub padding: Insets,
    /// Border widths.
    pub border: Insets,
}

impl BoxModel {
    /// A box of `size` with no margin, padding or border.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self {
            size,
            margin: Insets::ZERO,
            padding: Insets::ZERO,
            border: Insets::ZERO,
        }
    }

    /// Sets the margin edges.
    #[must_use]
    pub const fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the padding edges.
    #[must_use]
    pub const fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the border widths.
    #[must_use]
    pub const fn with_border(mut self, border: Insets) -> Self {
        self.border = border;
        self
    }
}

/// Reasons a measurement could not produce usable metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MeasureError {
    /// The container has no children to measure.
    #[error("list has no item to measure")]
    NoReferenceItem,
    /// The reference item has a zero, negative or non-finite outer size.
    #[error("item pitch is empty or not finite")]
    DegeneratePitch,
}

/// Layout of a wrapped grid of congruent items.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMetrics {
    /// Border-box size of one item.
    pub item_size: Size,
    /// Margin around one item.
    pub item_margin: Insets,
    /// Item size plus margins: the cell pitch along each axis.
    pub item_outer: Size,
    /// Offset from the container's bounding box to the border box of cell 0.
    pub container_offset: Vec2,
    /// Number of cells per row. Zero means the layout is not ready.
    pub columns: usize,
}

impl GridMetrics {
    /// Derives metrics from the container and its first item.
    ///
    /// `columns` is the number of whole cell pitches fitting in the
    /// container's inner width (border box minus padding and border) and may
    /// be zero when the container is narrower than one item.
    pub fn measure(container: &BoxModel, item: Option<&BoxModel>) -> Result<Self, MeasureError> {
        let item = item.ok_or(MeasureError::NoReferenceItem)?;
        let margin = item.margin;
        let item_outer = Size::new(
            item.size.width + margin.x0 + margin.x1,
            item.size.height + margin.y0 + margin.y1,
        );
        if !(item_outer.width.is_finite() && item_outer.height.is_finite())
            || item_outer.width <= 0.0
            || item_outer.height <= 0.0
        {
            return Err(MeasureError::DegeneratePitch);
        }

        let container_offset = Vec2::new(
            container.padding.x0 + container.border.x0 + margin.x0,
            container.padding.y0 + container.border.y0 + margin.y0,
        );
        let inner_width = container.size.width
            - (container.padding.x0
                + container.border.x0
                + container.padding.x1
                + container.border.x1);
        let fit = (inner_width / item_outer.width).floor();
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Column count is floored and clamped to be non-negative before the cast"
        )]
        let columns = if fit.is_finite() && fit > 0.0 {
            fit as usize
        } else {
            0
        };

        Ok(Self {
            item_size: item.size,
            item_margin: margin,
            item_outer,
            container_offset,
            columns,
        })
    }

    /// Returns `true` when at least one column fits.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.columns > 0
    }

    /// Column of a logical index, or `None` if the layout is not ready.
    #[must_use]
    pub fn column_of(&self, index: isize) -> Option<isize> {
        let columns = self.columns_isize()?;
        Some(index.rem_euclid(columns))
    }

    /// Row of a logical index, or `None` if the layout is not ready.
    #[must_use]
    pub fn row_of(&self, index: isize) -> Option<isize> {
        let columns = self.columns_isize()?;
        Some(index.div_euclid(columns))
    }

    /// Border-box origin of cell `index`, relative to the container's bounding box.
    #[must_use]
    pub fn cell_origin(&self, index: isize) -> Option<Vec2> {
        let column = self.column_of(index)?;
        let row = self.row_of(index)?;
        Some(
            self.container_offset
                + Vec2::new(
                    column as f64 * self.item_outer.width,
                    row as f64 * self.item_outer.height,
                ),
        )
    }

    fn columns_isize(&self) -> Option<isize> {
        if self.columns == 0 {
            return None;
        }
        isize::try_from(self.columns).ok()
    }
}
