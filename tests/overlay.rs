mod common;

use common::{Call, FakeSurface};
use gpui::{
    Bounds, Entity, Modifiers, Pixels, Point, TestAppContext, VisualTestContext, point, px,
};
use gpui_video_overlay::{MediaSignal, VideoOverlay, VideoOverlayEvent};
use pretty_assertions::assert_eq;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Overlay = VideoOverlay<FakeSurface>;

fn open(
    cx: &mut TestAppContext,
    build: impl FnOnce() -> Overlay + 'static,
) -> (Entity<Overlay>, &mut VisualTestContext) {
    cx.update(gpui_component::init);
    let (overlay, cx) = cx.add_window_view(|_window, _cx| build());
    cx.run_until_parked();
    (overlay, cx)
}

fn record_events(
    overlay: &Entity<Overlay>,
    cx: &mut VisualTestContext,
) -> Rc<RefCell<Vec<VideoOverlayEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    cx.update(|_window, cx| {
        cx.subscribe(overlay, move |_, event: &VideoOverlayEvent, _| {
            sink.borrow_mut().push(event.clone());
        })
        .detach();
    });
    events
}

fn bounds(cx: &mut VisualTestContext, selector: &'static str) -> Bounds<Pixels> {
    cx.debug_bounds(selector)
        .unwrap_or_else(|| panic!("{selector} was not drawn"))
}

fn move_to(cx: &mut VisualTestContext, position: Point<Pixels>) {
    cx.simulate_mouse_move(position, None, Modifiers::none());
    cx.run_until_parked();
}

fn click(cx: &mut VisualTestContext, position: Point<Pixels>) {
    cx.simulate_click(position, Modifiers::none());
    cx.run_until_parked();
}

fn controls_visible(overlay: &Entity<Overlay>, cx: &mut VisualTestContext) -> bool {
    overlay.read_with(cx, |overlay, _| overlay.controller().state().controls_visible)
}

#[gpui::test]
fn close_button_relays_request(cx: &mut TestAppContext) {
    let surface = FakeSurface::new();
    let closes = Rc::new(Cell::new(0));
    let counter = closes.clone();
    let (overlay, cx) = open(cx, move || {
        VideoOverlay::new(surface, "Clip").on_close(move |_, _| counter.set(counter.get() + 1))
    });
    let events = record_events(&overlay, cx);

    let close = bounds(cx, "video-overlay-close");
    click(cx, close.center());

    assert_eq!(closes.get(), 1);
    assert_eq!(*events.borrow(), vec![VideoOverlayEvent::CloseRequested]);
}

#[gpui::test]
fn backdrop_click_relays_request(cx: &mut TestAppContext) {
    let surface = FakeSurface::new();
    let closes = Rc::new(Cell::new(0));
    let counter = closes.clone();
    let (overlay, cx) = open(cx, move || {
        VideoOverlay::new(surface, "Clip").on_close(move |_, _| counter.set(counter.get() + 1))
    });
    let events = record_events(&overlay, cx);

    let dialog = bounds(cx, "video-overlay-dialog");
    assert!(dialog.origin.y > px(2.));
    click(cx, point(px(2.), px(2.)));

    assert_eq!(closes.get(), 1);
    assert_eq!(*events.borrow(), vec![VideoOverlayEvent::CloseRequested]);
}

#[gpui::test]
fn overlay_never_hides_itself(cx: &mut TestAppContext) {
    let surface = FakeSurface::new();
    let (overlay, cx) = open(cx, move || VideoOverlay::new(surface, "Clip"));

    click(cx, point(px(2.), px(2.)));
    let close = bounds(cx, "video-overlay-close");
    click(cx, close.center());

    assert!(overlay.read_with(cx, |overlay, _| overlay.is_shown()));
    assert!(cx.debug_bounds("video-overlay-dialog").is_some());
}

#[gpui::test]
fn media_click_toggles_playback_without_closing(cx: &mut TestAppContext) {
    let surface = FakeSurface::new();
    let handle = surface.clone();
    let (overlay, cx) = open(cx, move || VideoOverlay::new(surface, "Clip"));
    let events = record_events(&overlay, cx);

    let media = bounds(cx, "video-surface");
    click(cx, point(media.center().x, media.origin.y + px(10.)));

    assert_eq!(handle.calls(), vec![Call::Play]);
    assert!(overlay.read_with(cx, |overlay, _| overlay.controller().state().playing));
    assert!(events.borrow().is_empty());
}

#[gpui::test]
fn pressing_the_control_bar_does_not_toggle_playback(cx: &mut TestAppContext) {
    let surface = FakeSurface::new();
    let handle = surface.clone();
    let (overlay, cx) = open(cx, move || VideoOverlay::new(surface, "Clip"));
    let events = record_events(&overlay, cx);

    let media = bounds(cx, "video-surface");
    move_to(cx, media.center());
    let bar = bounds(cx, "video-controls");
    click(cx, point(bar.origin.x + px(4.), bar.origin.y + px(4.)));

    assert!(handle.calls().is_empty());
    assert!(!overlay.read_with(cx, |overlay, _| overlay.controller().state().playing));
    assert!(events.borrow().is_empty());
}

#[gpui::test]
fn controls_follow_pointer_over_surface(cx: &mut TestAppContext) {
    let surface = FakeSurface::new();
    let (overlay, cx) = open(cx, move || VideoOverlay::new(surface, "Clip"));
    let media = bounds(cx, "video-surface");

    move_to(cx, point(px(2.), px(2.)));
    assert!(!controls_visible(&overlay, cx));
    assert!(cx.debug_bounds("video-controls").is_none());

    move_to(cx, point(media.center().x, media.origin.y + px(10.)));
    assert!(controls_visible(&overlay, cx));

    // Moving across the bar must not hide it.
    let bar = bounds(cx, "video-controls");
    for offset in [4., 6., 8.] {
        move_to(cx, point(bar.origin.x + px(offset), bar.origin.y + px(offset)));
        assert!(controls_visible(&overlay, cx));
        assert!(cx.debug_bounds("video-controls").is_some());
    }
}

#[gpui::test]
fn hidden_overlay_stays_mounted(cx: &mut TestAppContext) {
    let surface = FakeSurface::new();
    let handle = surface.clone();
    let (overlay, cx) = open(cx, move || VideoOverlay::new(surface, "Clip").show(false));

    assert!(cx.debug_bounds("video-overlay-dialog").is_none());
    assert!(overlay.read_with(cx, |overlay, _| overlay.controller().is_mounted()));
    assert_eq!(handle.hub.listener_count(), 3);

    handle.emit(MediaSignal::MetadataLoaded { duration: 60.0 });
    handle.emit(MediaSignal::TimeUpdated(7.0));
    overlay.update(cx, |overlay, cx| overlay.set_show(true, cx));
    cx.run_until_parked();

    assert!(cx.debug_bounds("video-overlay-dialog").is_some());
    let label = overlay.read_with(cx, |overlay, _| overlay.controller().state().time_label());
    assert_eq!(label, "0:07 / 1:00");
}
