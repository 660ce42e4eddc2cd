// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item render contract.
//!
//! The engine never moves nodes around. Hosts lay items out in flow order
//! using [`ItemStyle::order`] and apply the optional visual properties on top.
//! The `Display` impls render the CSS text a DOM host would assign.

use core::fmt;

use kurbo::{Insets, Point, Size, Vec2};

/// Cubic Bezier easing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier(pub f64, pub f64, pub f64, pub f64);

impl CubicBezier {
    /// Curve used by items making way for the dragged one.
    pub const SHIFT: Self = Self(0.2, 0.0, 0.0, 1.0);
    /// Curve used by the released item settling into its slot.
    pub const DROP: Self = Self(0.23, 1.0, 0.32, 1.0);
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cubic-bezier({}, {}, {}, {})", self.0, self.1, self.2, self.3)
    }
}

/// Transition applied to the `transform` property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// Explicitly disable transitions (the element follows the pointer).
    Unset,
    /// Animate `transform` over `duration` milliseconds.
    Transform {
        /// Duration in milliseconds.
        duration: u64,
        /// Easing curve.
        easing: CubicBezier,
    },
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("unset"),
            Self::Transform { duration, easing } => write!(f, "transform {duration}ms {easing}"),
        }
    }
}

/// Pointer hit-testing mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvents {
    /// The element is transparent to pointer hits.
    None,
}

impl fmt::Display for PointerEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
        }
    }
}

/// A 2D translation rendered as `translate(Xpx, Ypx)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Translate(pub Vec2);

impl fmt::Display for Translate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({}px, {}px)", self.0.x, self.0.y)
    }
}

/// Style for one rendered item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemStyle {
    /// Flow order; equal to the item's static index.
    pub order: usize,
    /// Visual offset from the item's laid-out position.
    pub transform: Option<Vec2>,
    /// Transition for `transform`.
    pub transition: Option<Transition>,
    /// Fixed viewport position (`left`/`top`) taking the item out of flow.
    pub position: Option<Point>,
    /// Stacking order.
    pub z_index: Option<i32>,
    /// Pointer hit-testing override.
    pub pointer_events: Option<PointerEvents>,
}

impl ItemStyle {
    /// A plain in-flow style.
    #[must_use]
    pub const fn in_flow(order: usize) -> Self {
        Self {
            order,
            transform: None,
            transition: None,
            position: None,
            z_index: None,
            pointer_events: None,
        }
    }

    /// `transform` as a CSS value.
    #[must_use]
    pub fn css_transform(&self) -> Option<Translate> {
        self.transform.map(Translate)
    }
}

/// Style for the trailing placeholder that reserves grid flow while the
/// dragged item is out of flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaceholderStyle {
    /// Flow order; always after every item.
    pub order: usize,
    /// Item border-box size while a drag is visible.
    pub size: Option<Size>,
    /// Item margins while a drag is visible.
    pub margin: Option<Insets>,
}
