#![allow(dead_code)]

use gpui::{AnyElement, IntoElement, Pixels, Styled, div};
use gpui_video_overlay::{
    Listener, MediaSignal, MediaSurface, MediaView, SignalHub, SignalKind, Subscription,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
    Fullscreen,
}

/// In-memory surface recording every request.
#[derive(Clone)]
pub struct FakeSurface {
    calls: Arc<Mutex<Vec<Call>>>,
    pub hub: Arc<SignalHub>,
    fullscreen: bool,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            calls: Arc::default(),
            hub: SignalHub::new(),
            fullscreen: false,
        }
    }

    pub fn with_fullscreen() -> Self {
        Self {
            fullscreen: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn emit(&self, signal: MediaSignal) {
        self.hub.emit(signal);
    }
}

impl MediaSurface for FakeSurface {
    fn play(&self) {
        self.calls.lock().push(Call::Play);
    }

    fn pause(&self) {
        self.calls.lock().push(Call::Pause);
    }

    fn seek(&self, seconds: f64) {
        self.calls.lock().push(Call::Seek(seconds));
    }

    fn set_volume(&self, level: f64) {
        self.calls.lock().push(Call::Volume(level));
    }

    fn supports_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&self) {
        self.calls.lock().push(Call::Fullscreen);
    }

    fn subscribe(&self, kind: SignalKind, listener: Listener) -> Subscription {
        self.hub.subscribe(kind, listener)
    }
}

impl MediaView for FakeSurface {
    fn natural_size(&self) -> (u32, u32) {
        (640, 360)
    }

    fn media_element(&self, width: Pixels, height: Pixels) -> AnyElement {
        div().w(width).h(height).into_any_element()
    }
}
