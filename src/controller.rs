use crate::signal::{MediaSignal, SignalKind, Subscription};
use crate::state::PlaybackState;
use crate::surface::MediaSurface;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Owns the playback state of one overlay and forwards control-bar actions to a media surface.
///
/// Signals may arrive on any thread; they are queued and only folded into the state by
/// [`PlayerController::sync`], which runs on the UI thread.
pub struct PlayerController<S: MediaSurface> {
    surface: S,
    state: PlaybackState,
    inbox: Arc<Mutex<VecDeque<MediaSignal>>>,
    subscriptions: Vec<Subscription>,
}

impl<S: MediaSurface> PlayerController<S> {
    /// Create an unmounted controller over `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: PlaybackState::default(),
            inbox: Arc::new(Mutex::new(VecDeque::new())),
            subscriptions: Vec::with_capacity(SignalKind::ALL.len()),
        }
    }

    /// Subscribe to time, metadata and end-of-media signals. Does nothing when already mounted.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            return;
        }
        for kind in SignalKind::ALL {
            let inbox = Arc::clone(&self.inbox);
            let subscription = self.surface.subscribe(
                kind,
                Box::new(move |signal: &MediaSignal| inbox.lock().push_back(*signal)),
            );
            self.subscriptions.push(subscription);
        }
        log::debug!("player mounted");
    }

    /// Release the signal subscriptions and drop anything not yet synced.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.subscriptions.clear();
        self.inbox.lock().clear();
        log::debug!("player unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Fold queued signals into the state. Returns whether anything was applied.
    pub fn sync(&mut self) -> bool {
        let pending: Vec<MediaSignal> = self.inbox.lock().drain(..).collect();
        for signal in &pending {
            self.state.apply(signal);
        }
        !pending.is_empty()
    }

    /// Pause when playing, play otherwise, flipping the local flag without waiting for the
    /// surface to confirm.
    pub fn toggle_play(&mut self) {
        if self.state.playing {
            self.surface.pause();
        } else {
            self.surface.play();
        }
        self.state.playing = !self.state.playing;
    }

    /// Move the play head to `seconds`. Play-head reports queued before the seek are stale and
    /// are dropped so the next [`Self::sync`] cannot pull the position back.
    pub fn seek(&mut self, seconds: f64) {
        self.surface.seek(seconds);
        self.inbox
            .lock()
            .retain(|signal| signal.kind() != SignalKind::TimeUpdate);
        self.state.position = seconds;
    }

    pub fn set_volume(&mut self, level: f64) {
        self.surface.set_volume(level);
        self.state.volume = level;
    }

    /// Request fullscreen when the surface supports it. Returns whether a request was made.
    pub fn request_fullscreen(&self) -> bool {
        if !self.surface.supports_fullscreen() {
            return false;
        }
        self.surface.request_fullscreen();
        true
    }

    pub fn pointer_entered(&mut self) {
        self.state.controls_visible = true;
    }

    pub fn pointer_left(&mut self) {
        self.state.controls_visible = false;
    }

    /// Track the pointer against the player surface. Returns whether visibility changed.
    pub fn pointer_moved(&mut self, inside: bool) -> bool {
        if inside == self.state.controls_visible {
            return false;
        }
        if inside {
            self.pointer_entered();
        } else {
            self.pointer_left();
        }
        true
    }

    /// Placeholder behind the settings button.
    pub fn open_settings(&self) {
        log::trace!("settings requested; no settings panel available");
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: MediaSurface> Drop for PlayerController<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
