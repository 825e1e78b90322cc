use crate::config::OverlayConfig;
use crate::controller::PlayerController;
use crate::state::PlaybackState;
use crate::surface::MediaView;
use crate::video::Video;
use gpui::{
    App, ClickEvent, Context, DispatchPhase, Entity, EventEmitter, IntoElement, MouseButton,
    MouseDownEvent, MouseMoveEvent, ParentElement, Pixels, Render, SharedString, Styled, Window,
    canvas, div, prelude::*, px, rgba,
};
use gpui_component::button::{Button, ButtonVariants as _};
use gpui_component::slider::{Slider, SliderEvent, SliderState};
use gpui_component::{ActiveTheme as _, Sizable as _, h_flex, v_flex};
use std::rc::Rc;

/// Events emitted by [`VideoOverlay`].
#[derive(Debug, Clone, PartialEq)]
pub enum VideoOverlayEvent {
    /// The user asked to dismiss the dialog. The overlay stays mounted; the owner decides.
    CloseRequested,
}

type CloseHandler = Rc<dyn Fn(&mut Window, &mut App)>;

/// Range and steps the slider entities were built with.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SliderLayout {
    duration: f32,
    seek_step: f32,
    volume_step: f32,
}

struct ControlSliders {
    layout: SliderLayout,
    position: Entity<SliderState>,
    volume: Entity<SliderState>,
    _subscriptions: [gpui::Subscription; 2],
}

/// Modal dialog presenting a media surface with a hover-revealed control bar.
///
/// Signal subscriptions live as long as the view; dropping the entity releases them.
pub struct VideoOverlay<S: MediaView = Video> {
    controller: PlayerController<S>,
    title: SharedString,
    show: bool,
    fullscreen: bool,
    config: OverlayConfig,
    on_close: Option<CloseHandler>,
    sliders: Option<ControlSliders>,
}

impl VideoOverlay<Video> {
    /// Open the media at `uri` and mount an overlay for it.
    pub fn from_uri(uri: &url::Url, title: impl Into<SharedString>) -> Result<Self, crate::Error> {
        Ok(Self::new(Video::new(uri)?, title))
    }
}

impl<S: MediaView> VideoOverlay<S> {
    /// Mount an overlay over `surface`, titled `title`. Shown by default.
    pub fn new(surface: S, title: impl Into<SharedString>) -> Self {
        let mut controller = PlayerController::new(surface);
        controller.mount();
        Self {
            controller,
            title: title.into(),
            show: true,
            fullscreen: false,
            config: OverlayConfig::default(),
            on_close: None,
            sliders: None,
        }
    }

    pub fn show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Called when the close button or the backdrop is clicked.
    pub fn on_close(mut self, handler: impl Fn(&mut Window, &mut App) + 'static) -> Self {
        self.on_close = Some(Rc::new(handler));
        self
    }

    pub fn config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_show(&mut self, show: bool, cx: &mut Context<Self>) {
        self.show = show;
        cx.notify();
    }

    pub fn set_title(&mut self, title: impl Into<SharedString>, cx: &mut Context<Self>) {
        self.title = title.into();
        cx.notify();
    }

    pub fn is_shown(&self) -> bool {
        self.show
    }

    pub fn controller(&self) -> &PlayerController<S> {
        &self.controller
    }

    fn request_close(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        log::debug!("close requested for \"{}\"", self.title);
        cx.emit(VideoOverlayEvent::CloseRequested);
        if let Some(on_close) = self.on_close.clone() {
            on_close(window, cx);
        }
    }

    fn toggle_play(&mut self, cx: &mut Context<Self>) {
        self.controller.toggle_play();
        cx.notify();
    }

    fn toggle_fullscreen(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.fullscreen && window.is_fullscreen() {
            self.fullscreen = false;
            window.toggle_fullscreen();
        } else if !self.controller.request_fullscreen() {
            log::debug!("fullscreen not supported by this surface");
        }
        cx.notify();
    }

    fn pointer_moved(&mut self, inside: bool, cx: &mut Context<Self>) {
        if self.controller.pointer_moved(inside) {
            cx.notify();
        }
    }

    /// Media size: full width, natural aspect, capped height.
    fn media_size(&self, window: &Window, fullscreen: bool) -> (Pixels, Pixels) {
        let viewport = window.viewport_size();
        if fullscreen {
            return (viewport.width, viewport.height);
        }

        let width = if viewport.width < self.config.dialog_width {
            viewport.width
        } else {
            self.config.dialog_width
        };
        let max_height = viewport.height * self.config.max_height_fraction;
        let (video_width, video_height) = self.controller.surface().natural_size();
        let natural = if video_width > 0 {
            width * (video_height as f32 / video_width as f32)
        } else {
            max_height
        };
        let height = if natural < max_height { natural } else { max_height };
        (width, height)
    }

    fn build_sliders(
        layout: SliderLayout,
        state: &PlaybackState,
        cx: &mut Context<Self>,
    ) -> ControlSliders {
        let position = cx.new(|_| {
            SliderState::new()
                .min(0.)
                // An empty range has no track to map the pointer onto.
                .max(layout.duration.max(layout.seek_step))
                .step(layout.seek_step)
                .default_value(state.displayed_position() as f32)
        });
        let volume = cx.new(|_| {
            SliderState::new()
                .min(0.)
                .max(1.)
                .step(layout.volume_step)
                .default_value(state.volume as f32)
        });

        let subscriptions = [
            cx.subscribe(&position, |this, _, event: &SliderEvent, cx| {
                if let SliderEvent::Change(value) = event {
                    let state = this.controller.state();
                    // Nothing to seek within until the length is known.
                    if !state.has_duration() {
                        return;
                    }
                    let seconds = f64::from(value.start()).clamp(0., state.duration);
                    this.controller.seek(seconds);
                    cx.notify();
                }
            }),
            cx.subscribe(&volume, |this, _, event: &SliderEvent, cx| {
                if let SliderEvent::Change(value) = event {
                    let level = this.config.volume_level(value.start());
                    this.controller.set_volume(level);
                    cx.notify();
                }
            }),
        ];

        ControlSliders {
            layout,
            position,
            volume,
            _subscriptions: subscriptions,
        }
    }

    /// Slider entities matching the current state, rebuilt when the duration or a step changes.
    fn sync_sliders(
        &mut self,
        state: &PlaybackState,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> (Entity<SliderState>, Entity<SliderState>) {
        let layout = SliderLayout {
            duration: if state.has_duration() {
                state.duration as f32
            } else {
                0.
            },
            seek_step: self.config.seek_step as f32,
            volume_step: self.config.volume_step as f32,
        };

        let sliders = match self.sliders.take() {
            Some(sliders) if sliders.layout == layout => sliders,
            _ => Self::build_sliders(layout, state, cx),
        };
        let position = sliders.position.clone();
        let volume = sliders.volume.clone();
        self.sliders = Some(sliders);

        let displayed = state.displayed_position() as f32;
        position.update(cx, |slider, cx| {
            if slider.value().start() != displayed {
                slider.set_value(displayed, window, cx);
            }
        });
        let level = state.volume as f32;
        volume.update(cx, |slider, cx| {
            if slider.value().start() != level {
                slider.set_value(level, window, cx);
            }
        });

        (position, volume)
    }

    fn render_controls(
        &mut self,
        state: &PlaybackState,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> impl IntoElement + use<S> {
        let (position, volume) = self.sync_sliders(state, window, cx);
        let play_glyph = if state.playing { "⏸" } else { "▶" };

        let progress = h_flex()
            .gap_3()
            .child(div().flex_1().child(Slider::new(&position)))
            .child(
                div()
                    .text_xs()
                    .text_color(gpui::white())
                    .child(state.time_label()),
            );

        let volume = h_flex()
            .gap_1()
            .child(icon_button("video-volume-icon", "🔊"))
            .child(div().w(self.config.volume_width).child(Slider::new(&volume)));

        let buttons = h_flex()
            .gap_2()
            .child(icon_button("video-play-pause", play_glyph).on_click(cx.listener(
                |this, _: &ClickEvent, _window, cx| this.toggle_play(cx),
            )))
            .child(volume)
            .child(icon_button("video-fullscreen", "⛶").on_click(cx.listener(
                |this, _: &ClickEvent, window, cx| this.toggle_fullscreen(window, cx),
            )))
            .child(icon_button("video-settings", "⚙").on_click(cx.listener(
                |this, _: &ClickEvent, _window, _cx| this.controller.open_settings(),
            )));

        // The bar sits over the media; presses on it must not toggle playback.
        v_flex()
            .id("video-controls")
            .debug_selector(|| "video-controls".into())
            .absolute()
            .left_0()
            .right_0()
            .bottom_0()
            .px_3()
            .py_2()
            .gap_1()
            .bg(rgba(0x000000aa))
            .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
            .child(progress)
            .child(buttons)
    }
}

fn icon_button(id: &'static str, glyph: &'static str) -> Button {
    Button::new(id).ghost().small().label(glyph)
}

impl<S: MediaView> EventEmitter<VideoOverlayEvent> for VideoOverlay<S> {}

impl<S: MediaView> Render for VideoOverlay<S> {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.controller.sync();
        // Queued signals are folded in on the next frame; `Ended` stops the loop.
        if self.controller.state().playing {
            window.request_animation_frame();
        }

        if self.controller.surface().take_fullscreen_request() {
            self.fullscreen = true;
            if !window.is_fullscreen() {
                window.toggle_fullscreen();
            }
        }

        if !self.show {
            return div().id("video-overlay").into_any_element();
        }

        let state = self.controller.state().clone();
        let fullscreen = self.fullscreen && window.is_fullscreen();
        let (media_width, media_height) = self.media_size(window, fullscreen);
        let controls = state
            .controls_visible
            .then(|| self.render_controls(&state, window, cx));

        // Mouse moves are window-wide and unaffected by the bar's hitbox, so hovering the bar
        // still counts as hovering the surface.
        let view = cx.entity().downgrade();
        let pointer_tracker = canvas(
            |_, _, _| {},
            move |bounds, _, window, _| {
                window.on_mouse_event(move |event: &MouseMoveEvent, phase, _window, cx| {
                    if phase != DispatchPhase::Bubble {
                        return;
                    }
                    let inside = bounds.contains(&event.position);
                    view.update(cx, |this, cx| this.pointer_moved(inside, cx)).ok();
                });
            },
        )
        .absolute()
        .inset_0()
        .size_full();

        let surface = div()
            .debug_selector(|| "video-surface".into())
            .relative()
            .w(media_width)
            .h(media_height)
            .bg(gpui::black())
            .child(pointer_tracker)
            .child(
                div()
                    .id("video-media")
                    .size_full()
                    .on_click(cx.listener(|this, _: &ClickEvent, _window, cx| {
                        this.toggle_play(cx)
                    }))
                    .child(
                        self.controller
                            .surface()
                            .media_element(media_width, media_height),
                    ),
            )
            .children(controls);

        if fullscreen {
            return div()
                .id("video-overlay")
                .absolute()
                .inset_0()
                .size_full()
                .bg(gpui::black())
                .child(surface)
                .into_any_element();
        }

        let theme = cx.theme();
        let header = h_flex()
            .justify_between()
            .px_4()
            .py_3()
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .text_lg()
                    .text_color(theme.foreground)
                    .child(self.title.clone()),
            )
            .child(
                div()
                    .debug_selector(|| "video-overlay-close".into())
                    .child(icon_button("video-overlay-close", "✕").on_click(cx.listener(
                        |this, _: &ClickEvent, window, cx| this.request_close(window, cx),
                    ))),
            );

        let dialog = v_flex()
            .id("video-overlay-dialog")
            .debug_selector(|| "video-overlay-dialog".into())
            .w(media_width)
            .bg(theme.background)
            .border_1()
            .border_color(theme.border)
            .rounded_lg()
            .overflow_hidden()
            .shadow_lg()
            .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
            .child(header)
            .child(surface);

        div()
            .id("video-overlay")
            .absolute()
            .inset_0()
            .size_full()
            .flex()
            .items_center()
            .justify_center()
            .p(px(16.))
            .bg(theme.overlay)
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, _: &MouseDownEvent, window, cx| {
                    this.request_close(window, cx)
                }),
            )
            .child(dialog)
            .into_any_element()
    }
}
