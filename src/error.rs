use gstreamer as gst;

/// Errors raised while opening media for the overlay.
///
/// Playback operations themselves never fail loudly; see [`crate::MediaSurface`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Glib(#[from] glib::Error),
    #[error("{0}")]
    Bool(#[from] glib::BoolError),
    #[error("failed to get the gstreamer bus")]
    Bus,
    #[error("failed to cast gstreamer element")]
    Cast,
    #[error("failed to read media capabilities")]
    Caps,
    #[error("failed to change pipeline state: {0}")]
    StateChange(#[from] gst::StateChangeError),
    #[error("failed to spawn the decode worker: {0}")]
    Io(#[from] std::io::Error),
}
