//! # GPUI Video Overlay
//!
//! A modal video player for GPUI applications, backed by GStreamer.
//!
//! ## Features
//!
//! - Dialog with a title header and a close affordance relayed to the caller
//! - Control bar revealed on hover: play/pause, seek, volume, fullscreen, settings
//! - `m:ss` elapsed / total time display
//! - [`MediaSurface`] and [`MediaView`] traits so the player and its view run against any
//!   playback backend
//! - Signal subscriptions scoped to the overlay's lifetime
//!
//! ## Example
//!
//! The control bar is built from `gpui-component` widgets, so `gpui_component::init` must run
//! before the first overlay is drawn.
//!
//! ```rust,no_run
//! use gpui::{App, AppContext, Application, WindowOptions};
//! use gpui_video_overlay::{Url, VideoOverlay};
//!
//! Application::new().run(|cx: &mut App| {
//!     gpui_component::init(cx);
//!     let uri = Url::parse("file:///path/to/video.mp4").unwrap();
//!     cx.open_window(WindowOptions::default(), |_, cx| {
//!         cx.new(|_| {
//!             VideoOverlay::from_uri(&uri, "My video")
//!                 .unwrap()
//!                 .on_close(|_window, _cx| log::info!("close requested"))
//!         })
//!     })
//!     .unwrap();
//! });
//! ```

mod config;
mod controller;
mod element;
mod error;
mod overlay;
mod signal;
mod state;
mod surface;
mod video;

pub use config::OverlayConfig;
pub use controller::PlayerController;
pub use element::{VideoElement, video};
pub use error::Error;
pub use overlay::{VideoOverlay, VideoOverlayEvent};
pub use signal::{Listener, MediaSignal, SignalHub, SignalKind, Subscription};
pub use state::{PlaybackState, format_time};
pub use surface::{MediaSurface, MediaView};
pub use video::Video;

// Re-export commonly used types
pub use url::Url;
pub use gstreamer as gst;
