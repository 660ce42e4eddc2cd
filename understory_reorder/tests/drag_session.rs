// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end drag sessions against a scripted page.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Insets, Point, Rect, Size, Vec2};
use understory_reorder::{
    BoxModel, CubicBezier, DragEvent, DragState, Host, PointerEvents, ReorderEngine, Transition,
    Viewport,
};

/// A page with one list container at document position `origin`.
///
/// Items are 150x150 with 25px margins (200px pitch); the container has 25px
/// padding and a 4px border, so cell `i` sits at `origin + 54 + (col, row) * 200`.
struct Page {
    origin: Point,
    container: BoxModel,
    item: Option<BoxModel>,
    viewport: Size,
    content: Size,
    scroll: Vec2,
    scrolled: Vec<Vec2>,
}

impl Page {
    fn new(width: f64) -> Self {
        Self {
            origin: Point::new(20.0, 20.0),
            container: BoxModel::new(Size::new(width, 658.0))
                .with_padding(Insets::uniform(25.0))
                .with_border(Insets::uniform(4.0)),
            item: Some(BoxModel::new(Size::new(150.0, 150.0)).with_margin(Insets::uniform(25.0))),
            viewport: Size::new(1000.0, 700.0),
            content: Size::new(1000.0, 2000.0),
            scroll: Vec2::ZERO,
            scrolled: Vec::new(),
        }
    }

    /// Viewport-space border box of the item at `index` in a 3-column grid.
    fn item_rect(&self, index: usize) -> Rect {
        let (col, row) = ((index % 3) as f64, (index / 3) as f64);
        let origin = self.origin - self.scroll + Vec2::new(54.0 + col * 200.0, 54.0 + row * 200.0);
        Rect::from_origin_size(origin, Size::new(150.0, 150.0))
    }
}

impl Host for Page {
    fn container_box(&self) -> BoxModel {
        self.container
    }

    fn first_item_box(&self) -> Option<BoxModel> {
        self.item
    }

    fn container_bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin - self.scroll, self.container.size)
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport, self.scroll, self.content)
    }

    fn scroll_by(&mut self, delta: Vec2) {
        let max = Vec2::new(
            self.content.width - self.viewport.width,
            self.content.height - self.viewport.height,
        );
        let next = self.scroll + delta;
        self.scroll = Vec2::new(next.x.clamp(0.0, max.x), next.y.clamp(0.0, max.y));
        self.scrolled.push(delta);
    }
}

fn setup() -> (Page, ReorderEngine, Rc<RefCell<Vec<DragEvent>>>) {
    let page = Page::new(658.0);
    let mut engine = ReorderEngine::default();
    assert!(engine.measure(&page));
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |e| sink.borrow_mut().push(*e));
    (page, engine, events)
}

/// What a list owner does with `drag-end`.
fn apply_drag_end<T>(items: &mut Vec<T>, source: usize, destination: Option<isize>) {
    let Some(destination) = destination else {
        return;
    };
    let last = items.len().saturating_sub(1);
    let destination = usize::try_from(destination).unwrap_or(0).min(last);
    if destination == source || source > last {
        return;
    }
    let item = items.remove(source);
    items.insert(destination, item);
}

#[test]
fn press_and_release_without_moving_is_silent() {
    let (page, mut engine, events) = setup();
    assert!(engine.on_pointer_down(4, page.item_rect(4), &page));
    assert_eq!(engine.state(), DragState::Grabbing);
    engine.on_pointer_up(&page, 10);

    assert_eq!(engine.state(), DragState::Idle);
    assert!(engine.session().is_none());
    assert_eq!(engine.pending_tasks(), 0);
    assert!(events.borrow().is_empty());
}

#[test]
fn full_session_emits_start_updates_end_in_order() {
    let (mut page, mut engine, events) = setup();
    engine.on_pointer_down(0, page.item_rect(0), &page);
    // One cell right, then one more, then a jitter within the same cell.
    engine.on_pointer_move(Vec2::new(200.0, 0.0), &page, 16);
    engine.on_pointer_move(Vec2::new(200.0, 0.0), &page, 32);
    engine.on_pointer_move(Vec2::new(3.0, 2.0), &page, 48);
    engine.on_pointer_up(&page, 64);
    assert_eq!(engine.state(), DragState::Dropping);

    engine.tick(&mut page, 64 + 349);
    assert_eq!(engine.state(), DragState::Dropping);
    engine.tick(&mut page, 64 + 350);
    assert_eq!(engine.state(), DragState::Idle);

    assert_eq!(
        *events.borrow(),
        [
            DragEvent::Start { source: 0 },
            DragEvent::Update {
                source: 0,
                destination: Some(1)
            },
            DragEvent::Update {
                source: 0,
                destination: Some(2)
            },
            DragEvent::End {
                source: 0,
                destination: Some(2)
            },
        ]
    );
}

#[test]
fn dragging_the_last_item_to_the_front_row() {
    let (mut page, mut engine, events) = setup();
    let mut items = vec![1, 2, 3, 4, 5, 6];
    engine.on_pointer_down(5, page.item_rect(5), &page);
    engine.on_pointer_move(Vec2::new(-200.0, -200.0), &page, 16);
    assert_eq!(engine.over_index(), Some(1));
    engine.on_pointer_up(&page, 32);
    engine.tick(&mut page, 1000);

    let end = *events.borrow().last().unwrap();
    assert_eq!(
        end,
        DragEvent::End {
            source: 5,
            destination: Some(1)
        }
    );
    apply_drag_end(&mut items, end.source(), end.destination());
    assert_eq!(items, [1, 6, 2, 3, 4, 5]);
}

#[test]
fn release_outside_the_list_drops_back_in_place() {
    let (mut page, mut engine, events) = setup();
    engine.on_pointer_down(0, page.item_rect(0), &page);
    engine.on_pointer_move(Vec2::new(-300.0, 0.0), &page, 16);
    assert_eq!(engine.over_index(), None);
    engine.on_pointer_up(&page, 32);

    // The frozen destination falls back to the grabbed index and the item
    // animates back to its own cell.
    assert_eq!(engine.over_index(), Some(0));
    let style = engine.item_style(0);
    assert_eq!(style.transform, Some(Vec2::ZERO));
    assert_eq!(
        style.transition,
        Some(Transition::Transform {
            duration: 350,
            easing: CubicBezier::DROP
        })
    );

    engine.tick(&mut page, 32 + 350);
    assert_eq!(
        events.borrow().last(),
        Some(&DragEvent::End {
            source: 0,
            destination: Some(0)
        })
    );
    let mut items = vec!['a', 'b', 'c'];
    apply_drag_end(&mut items, 0, Some(0));
    assert_eq!(items, ['a', 'b', 'c']);
}

#[test]
fn scrolling_moves_the_list_under_a_stationary_pointer() {
    let (mut page, mut engine, events) = setup();
    engine.on_pointer_down(4, page.item_rect(4), &page);
    engine.on_pointer_move(Vec2::new(1.0, 0.0), &page, 16);
    assert_eq!(engine.over_index(), Some(4));

    page.scroll = Vec2::new(0.0, 200.0);
    engine.on_scroll(&page, 20);
    assert_eq!(engine.over_index(), Some(7));
    assert_eq!(
        events.borrow().last(),
        Some(&DragEvent::Update {
            source: 4,
            destination: Some(7)
        })
    );
}

#[test]
fn auto_scroll_runs_near_the_edge_and_stops_on_release() {
    let (mut page, mut engine, _events) = setup();
    engine.on_pointer_down(7, page.item_rect(7), &page);
    // Bottom edge of the dragged box ends 36px above the viewport's bottom.
    engine.on_pointer_move(Vec2::new(0.0, 40.0), &page, 0);
    assert_eq!(engine.auto_scroll_vector(), Some(Vec2::new(0.0, 5.0)));
    assert_eq!(engine.next_deadline(), Some(10));

    engine.tick(&mut page, 100);
    assert_eq!(page.scrolled.len(), 10);
    assert_eq!(page.scroll, Vec2::new(0.0, 50.0));

    engine.on_pointer_up(&page, 100);
    assert_eq!(engine.auto_scroll_vector(), None);
    engine.tick(&mut page, 5000);
    assert_eq!(page.scrolled.len(), 10);
    assert_eq!(engine.state(), DragState::Idle);
    assert_eq!(engine.pending_tasks(), 0);
}

#[test]
fn auto_scroll_stops_when_the_pointer_leaves_the_edge() {
    let (mut page, mut engine, _events) = setup();
    engine.on_pointer_down(7, page.item_rect(7), &page);
    engine.on_pointer_move(Vec2::new(0.0, 40.0), &page, 0);
    engine.tick(&mut page, 20);
    assert_eq!(page.scrolled.len(), 2);

    engine.on_pointer_move(Vec2::new(0.0, -200.0), &page, 25);
    assert_eq!(engine.auto_scroll_vector(), None);
    engine.tick(&mut page, 500);
    assert_eq!(page.scrolled.len(), 2);
}

#[test]
fn peers_animate_while_auto_scroll_moves_the_target() {
    let (mut page, mut engine, events) = setup();
    page.scroll = Vec2::new(0.0, 300.0);
    engine.on_pointer_down(7, page.item_rect(7), &page);
    // Top edge of the dragged box ends 34px below the viewport's top.
    engine.on_pointer_move(Vec2::new(0.0, -140.0), &page, 0);
    assert_eq!(engine.over_index(), Some(4));
    assert_eq!(engine.item_style(5).transition, None);

    // Pointer held still; only the scroll timer runs.
    engine.tick(&mut page, 280);
    assert_eq!(page.scroll, Vec2::new(0.0, 160.0));
    assert_eq!(engine.over_index(), Some(1));
    assert_eq!(
        events.borrow().last(),
        Some(&DragEvent::Update {
            source: 7,
            destination: Some(1)
        })
    );
    let shift = Some(Transition::Transform {
        duration: 450,
        easing: CubicBezier::SHIFT,
    });
    for index in [1, 2, 3, 4, 5, 6, 8] {
        let style = engine.item_style(index);
        assert!(style.transform.is_some(), "item {index} should make way");
        assert_eq!(style.transition, shift, "item {index}");
    }
}

#[test]
fn forced_cancel_tears_down_the_scroll_timer() {
    let (mut page, mut engine, events) = setup();
    engine.on_pointer_down(7, page.item_rect(7), &page);
    engine.on_pointer_move(Vec2::new(0.0, 40.0), &page, 0);
    assert!(engine.cancel());
    assert!(!engine.cancel());
    assert_eq!(engine.pending_tasks(), 0);

    engine.tick(&mut page, 1000);
    assert!(page.scrolled.is_empty());
    // Start only; a forced teardown never reports an end.
    assert_eq!(*events.borrow(), [DragEvent::Start { source: 7 }]);
}

#[test]
fn regrab_while_dropping_finishes_the_previous_drop_first() {
    let (mut page, mut engine, events) = setup();
    engine.on_pointer_down(0, page.item_rect(0), &page);
    engine.on_pointer_move(Vec2::new(200.0, 0.0), &page, 16);
    engine.on_pointer_up(&page, 100);

    // Settle would fire at 450; a new grab arrives first.
    assert!(engine.on_pointer_down(3, page.item_rect(3), &page));
    assert_eq!(
        events.borrow().last(),
        Some(&DragEvent::End {
            source: 0,
            destination: Some(1)
        })
    );
    assert_eq!(engine.state(), DragState::Grabbing);

    engine.tick(&mut page, 450);
    assert_eq!(engine.state(), DragState::Grabbing);
    assert_eq!(engine.grabbed_index(), Some(3));
    assert_eq!(
        events
            .borrow()
            .iter()
            .filter(|e| matches!(e, DragEvent::End { .. }))
            .count(),
        1
    );
}

#[test]
fn second_press_during_a_drag_is_ignored() {
    let (page, mut engine, _events) = setup();
    engine.on_pointer_down(0, page.item_rect(0), &page);
    engine.on_pointer_move(Vec2::new(5.0, 5.0), &page, 16);
    assert!(!engine.on_pointer_down(2, page.item_rect(2), &page));
    assert_eq!(engine.grabbed_index(), Some(0));
}

#[test]
fn resize_remeasures_once_after_the_debounce() {
    let (mut page, mut engine, _events) = setup();
    assert_eq!(engine.metrics().unwrap().columns, 3);

    page.container.size.width = 858.0;
    engine.on_resize(0);
    engine.on_resize(300);
    engine.on_resize(600);
    assert_eq!(engine.pending_tasks(), 1);

    engine.tick(&mut page, 1099);
    assert_eq!(engine.metrics().unwrap().columns, 3);
    engine.tick(&mut page, 1100);
    assert_eq!(engine.metrics().unwrap().columns, 4);
    assert_eq!(engine.pending_tasks(), 0);
}

#[test]
fn empty_list_keeps_the_previous_metrics() {
    let (mut page, mut engine, _events) = setup();
    let before = *engine.metrics().unwrap();
    page.item = None;
    assert!(!engine.measure(&page));
    assert_eq!(engine.metrics(), Some(&before));
}

#[test]
fn styles_follow_the_session() {
    let (mut page, mut engine, _events) = setup();
    engine.on_pointer_down(1, page.item_rect(1), &page);
    // Still in flow while grabbing.
    assert_eq!(engine.item_style(1), understory_reorder::ItemStyle::in_flow(1));
    assert_eq!(engine.placeholder_style(9).size, None);

    // Lift without changing the target cell.
    engine.on_pointer_move(Vec2::new(10.0, 0.0), &page, 16);
    let grabbed = engine.item_style(1);
    assert_eq!(grabbed.position, Some(Point::new(249.0, 49.0)));
    assert_eq!(grabbed.transform, Some(Vec2::new(10.0, 0.0)));
    assert_eq!(grabbed.transition, Some(Transition::Unset));
    assert_eq!(grabbed.z_index, Some(2));
    assert_eq!(grabbed.pointer_events, Some(PointerEvents::None));

    // The frame right after the lift applies offsets without a transition.
    let first_of_row = engine.item_style(3);
    assert_eq!(first_of_row.transition, None);
    assert_eq!(first_of_row.transform, Some(Vec2::new(-400.0, 200.0)));
    assert_eq!(first_of_row.z_index, Some(1));
    assert_eq!(engine.item_style(2).transform, Some(Vec2::new(200.0, 0.0)));
    assert_eq!(engine.item_style(0).transform, None);

    engine.on_pointer_move(Vec2::new(1.0, 0.0), &page, 32);
    assert_eq!(
        engine.item_style(2).transition,
        Some(Transition::Transform {
            duration: 450,
            easing: CubicBezier::SHIFT
        })
    );

    let placeholder = engine.placeholder_style(9);
    assert_eq!(placeholder.order, 10);
    assert_eq!(placeholder.size, Some(Size::new(150.0, 150.0)));
    assert_eq!(placeholder.margin, Some(Insets::uniform(25.0)));

    engine.on_pointer_up(&page, 48);
    engine.tick(&mut page, 48 + 350);
    assert_eq!(engine.item_style(3), understory_reorder::ItemStyle::in_flow(3));
}
