use crate::signal::{Listener, SignalKind, Subscription};
use gpui::{AnyElement, Pixels};

/// The control surface of a media playback primitive.
///
/// Requests are fire-and-forget: implementations report outcomes through signals, and failures
/// are logged rather than returned.
pub trait MediaSurface {
    /// Start or resume playback.
    fn play(&self);

    /// Pause playback.
    fn pause(&self);

    /// Move the play head to `seconds`.
    fn seek(&self, seconds: f64);

    /// Set the audio level, `0.0..=1.0`.
    fn set_volume(&self, level: f64);

    /// Whether the surface can be presented fullscreen.
    fn supports_fullscreen(&self) -> bool {
        false
    }

    /// Ask for fullscreen presentation. Only called when [`Self::supports_fullscreen`] is true.
    fn request_fullscreen(&self) {}

    /// Listen for signals of `kind` until the returned guard is dropped.
    fn subscribe(&self, kind: SignalKind, listener: Listener) -> Subscription;
}

/// A [`MediaSurface`] the overlay knows how to draw.
pub trait MediaView: MediaSurface + 'static {
    /// Natural frame size as `(width, height)`, zero until known.
    fn natural_size(&self) -> (u32, u32);

    /// Consume a pending fullscreen request made through [`MediaSurface::request_fullscreen`].
    fn take_fullscreen_request(&self) -> bool {
        false
    }

    /// Element presenting the media at `width` x `height`.
    fn media_element(&self, width: Pixels, height: Pixels) -> AnyElement;
}
