// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless drag-to-reorder on a scrolled 3-column grid.
//!
//! A card in the third row is dragged up against the top of the viewport.
//! The engine auto-scrolls the page back to the top while the pointer stays
//! still, the drop target follows the list under the card, and on release the
//! list owner applies the `drag-end` splice.
//!
//! Run:
//! - `RUST_LOG=understory_reorder=trace cargo run -p understory_reorder_demos --example reorder_grid`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Insets, Point, Rect, Size, Vec2};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use understory_reorder::{BoxModel, DragEvent, Host, ReorderEngine, Viewport};

const FRAME: u64 = 16;
const COLUMNS: usize = 3;

/// A document with a single list container, scrolled by a window viewport.
#[derive(Debug)]
struct Page {
    container_origin: Point,
    container: BoxModel,
    card: BoxModel,
    len: usize,
    viewport: Size,
    scroll: Vec2,
}

impl Page {
    fn content(&self) -> Size {
        Size::new(self.viewport.width, 1400.0)
    }

    /// Viewport-space border box of the card at `index`.
    fn card_rect(&self, index: usize) -> Rect {
        let pitch = Size::new(
            self.card.size.width + self.card.margin.x0 + self.card.margin.x1,
            self.card.size.height + self.card.margin.y0 + self.card.margin.y1,
        );
        let inset = Vec2::new(
            self.container.padding.x0 + self.container.border.x0 + self.card.margin.x0,
            self.container.padding.y0 + self.container.border.y0 + self.card.margin.y0,
        );
        let (col, row) = (index % COLUMNS, index / COLUMNS);
        let origin = self.container_origin - self.scroll
            + inset
            + Vec2::new(col as f64 * pitch.width, row as f64 * pitch.height);
        Rect::from_origin_size(origin, self.card.size)
    }
}

impl Host for Page {
    fn container_box(&self) -> BoxModel {
        self.container
    }

    fn first_item_box(&self) -> Option<BoxModel> {
        (self.len > 0).then_some(self.card)
    }

    fn container_bounds(&self) -> Rect {
        Rect::from_origin_size(self.container_origin - self.scroll, self.container.size)
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport, self.scroll, self.content())
    }

    fn scroll_by(&mut self, delta: Vec2) {
        let content = self.content();
        let next = self.scroll + delta;
        self.scroll = Vec2::new(
            next.x.clamp(0.0, (content.width - self.viewport.width).max(0.0)),
            next.y.clamp(0.0, (content.height - self.viewport.height).max(0.0)),
        );
    }
}

/// Moves `source` to `destination`, clamping out-of-range targets.
fn apply_drag_end<T>(items: &mut Vec<T>, source: usize, destination: Option<isize>) {
    let Some(destination) = destination else {
        return;
    };
    if source >= items.len() {
        return;
    }
    let last = items.len() - 1;
    let destination = usize::try_from(destination).unwrap_or(0).min(last);
    let item = items.remove(source);
    items.insert(destination, item);
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "understory_reorder=debug,reorder_grid=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cards: Rc<RefCell<Vec<&str>>> = Rc::new(RefCell::new(vec![
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
    ]));
    let mut page = Page {
        container_origin: Point::new(20.0, 20.0),
        container: BoxModel::new(Size::new(658.0, 658.0))
            .with_padding(Insets::uniform(25.0))
            .with_border(Insets::uniform(4.0)),
        card: BoxModel::new(Size::new(150.0, 150.0)).with_margin(Insets::uniform(25.0)),
        len: cards.borrow().len(),
        viewport: Size::new(1000.0, 500.0),
        scroll: Vec2::new(0.0, 300.0),
    };

    let mut engine = ReorderEngine::default();
    let owner = Rc::clone(&cards);
    engine.subscribe(move |event| {
        info!(event = event.name(), source = event.source(), destination = ?event.destination());
        if let DragEvent::End {
            source,
            destination,
        } = *event
        {
            apply_drag_end(&mut owner.borrow_mut(), source, destination);
        }
    });
    engine.measure(&page);

    let grabbed = 7;
    let mut now = 0;
    engine.on_pointer_down(grabbed, page.card_rect(grabbed), &page);

    // Drag straight up in small steps until the card touches the top edge.
    for _ in 0..7 {
        now += FRAME;
        engine.on_pointer_move(Vec2::new(0.0, -20.0), &page, now);
        engine.tick(&mut page, now);
    }

    // Hold still while the page scrolls underneath.
    while engine.auto_scroll_vector().is_some() && now < 2_000 {
        now += FRAME;
        engine.tick(&mut page, now);
    }
    info!(scroll = page.scroll.y, over = ?engine.over_index(), "auto-scroll settled");

    for index in 0..page.len {
        let style = engine.item_style(index);
        if let Some(transform) = style.css_transform() {
            info!(card = cards.borrow()[index], %transform, "making way");
        }
    }

    engine.on_pointer_up(&page, now);
    while let Some(deadline) = engine.next_deadline() {
        now = now.max(deadline);
        engine.tick(&mut page, now);
    }

    println!("{}", cards.borrow().join(" "));
}
