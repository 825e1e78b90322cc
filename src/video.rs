use crate::Error;
use crate::signal::{Listener, MediaSignal, SignalHub, SignalKind, Subscription};
use crate::element::video;
use crate::surface::{MediaSurface, MediaView};
use gpui::{AnyElement, IntoElement, Pixels};
use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_app::prelude::*;
use gstreamer_video as gst_video;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// How often the worker reports the play head while playing.
const TIME_UPDATE_INTERVAL: Duration = Duration::from_millis(250);
/// Sample pull timeout, roughly one frame at 60 fps.
const PULL_TIMEOUT_MS: u64 = 16;

fn clock_to_seconds(time: gst::ClockTime) -> f64 {
    time.nseconds() as f64 / 1_000_000_000.0
}

fn seconds_to_clock(seconds: f64) -> gst::ClockTime {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    gst::ClockTime::from_nseconds((seconds * 1_000_000_000.0).round() as u64)
}

#[derive(Debug)]
pub(crate) struct Frame(gst::Sample);

impl Frame {
    pub fn empty() -> Self {
        Self(gst::Sample::builder().build())
    }

    pub fn readable(&self) -> Option<gst::BufferMap<'_, gst::buffer::Readable>> {
        self.0.buffer().and_then(|x| x.map_readable().ok())
    }
}

#[derive(Debug)]
pub(crate) struct Internal {
    pub(crate) source: gst::Pipeline,
    pub(crate) alive: Arc<AtomicBool>,
    pub(crate) worker: Option<std::thread::JoinHandle<()>>,

    pub(crate) width: u32,
    pub(crate) height: u32,

    pub(crate) frame: Arc<Mutex<Frame>>,
    pub(crate) upload_frame: Arc<AtomicBool>,
    pub(crate) is_eos: Arc<AtomicBool>,
    pub(crate) fullscreen_requested: AtomicBool,

    pub(crate) signals: Arc<SignalHub>,
}

impl Internal {
    fn set_state(&self, state: gst::State) {
        if let Err(err) = self.source.set_state(state) {
            log::warn!("failed to switch pipeline to {state:?}: {err}");
        }
    }

    fn seek(&self, seconds: f64) {
        let flags = gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE;
        match self.source.seek_simple(flags, seconds_to_clock(seconds)) {
            Ok(()) => self.is_eos.store(false, Ordering::SeqCst),
            Err(err) => log::warn!("seek to {seconds:.3}s failed: {err}"),
        }
    }

    fn play(&self) {
        // A finished stream plays again from the start.
        if self.is_eos.swap(false, Ordering::SeqCst) {
            self.seek(0.0);
        }
        self.set_state(gst::State::Playing);
    }

    fn paused(&self) -> bool {
        self.source.state(gst::ClockTime::ZERO).1 != gst::State::Playing
    }
}

/// Everything the decode worker needs, moved onto its thread.
struct Worker {
    pipeline: gst::Pipeline,
    bus: gst::Bus,
    sink: gst_app::AppSink,
    alive: Arc<AtomicBool>,
    frame: Arc<Mutex<Frame>>,
    upload_frame: Arc<AtomicBool>,
    is_eos: Arc<AtomicBool>,
    signals: Arc<SignalHub>,
}

impl Worker {
    fn run(self) {
        let mut last_tick: Option<Instant> = None;
        let mut last_pts = None;

        while self.alive.load(Ordering::Acquire) {
            self.drain_bus();

            let playing = self.pipeline.state(gst::ClockTime::ZERO).1 == gst::State::Playing;
            let timeout = gst::ClockTime::from_mseconds(PULL_TIMEOUT_MS);

            let sample = if playing {
                if self.sink.is_eos() {
                    std::thread::sleep(Duration::from_millis(PULL_TIMEOUT_MS));
                    continue;
                }
                self.sink.try_pull_sample(timeout)
            } else {
                std::thread::sleep(Duration::from_millis(PULL_TIMEOUT_MS));
                self.sink.try_pull_preroll(timeout)
            };
            let Some(sample) = sample else {
                continue;
            };

            let pts = sample.buffer().and_then(|buffer| buffer.pts());
            if playing || pts != last_pts {
                last_pts = pts;
                *self.frame.lock() = Frame(sample);
                self.upload_frame.store(true, Ordering::SeqCst);
            }

            if playing && last_tick.is_none_or(|at| at.elapsed() >= TIME_UPDATE_INTERVAL) {
                last_tick = Some(Instant::now());
                if let Some(position) = self.pipeline.query_position::<gst::ClockTime>() {
                    self.signals
                        .emit(MediaSignal::TimeUpdated(clock_to_seconds(position)));
                }
            }
        }
    }

    fn drain_bus(&self) {
        while let Some(msg) = self.bus.pop_filtered(&[
            gst::MessageType::Eos,
            gst::MessageType::Error,
            gst::MessageType::DurationChanged,
        ]) {
            match msg.view() {
                gst::MessageView::Eos(_) => {
                    self.is_eos.store(true, Ordering::SeqCst);
                    if let Some(position) = self.pipeline.query_position::<gst::ClockTime>() {
                        self.signals
                            .emit(MediaSignal::TimeUpdated(clock_to_seconds(position)));
                    }
                    self.signals.emit(MediaSignal::Ended);
                }
                gst::MessageView::Error(err) => {
                    log::error!("GStreamer error: {}", err.error());
                }
                gst::MessageView::DurationChanged(_) => {
                    if let Some(duration) = self.pipeline.query_duration::<gst::ClockTime>() {
                        self.signals.emit(MediaSignal::MetadataLoaded {
                            duration: clock_to_seconds(duration),
                        });
                    }
                }
                _ => {}
            }
        }
    }
}

/// A video loaded from a URI (a local file or an HTTP stream), driven by a GStreamer `playbin`.
///
/// Cloning shares the same pipeline; the pipeline shuts down when the last clone drops.
#[derive(Debug, Clone)]
pub struct Video(pub(crate) Arc<RwLock<Internal>>);

impl Drop for Video {
    fn drop(&mut self) {
        if Arc::strong_count(&self.0) != 1 {
            return;
        }
        if let Some(mut inner) = self.0.try_write() {
            if let Err(err) = inner.source.set_state(gst::State::Null) {
                log::warn!("failed to stop pipeline: {err}");
            }

            inner.alive.store(false, Ordering::SeqCst);
            if let Some(worker) = inner.worker.take() {
                if let Err(err) = worker.join() {
                    match err.downcast_ref::<String>() {
                        Some(e) => log::error!("Video thread panicked: {e}"),
                        None => log::error!("Video thread panicked with unknown reason"),
                    }
                }
            }
        }
    }
}

impl Video {
    /// Open the media at `uri`. The video starts paused on its first frame.
    pub fn new(uri: &url::Url) -> Result<Self, Error> {
        gst::init()?;

        let pipeline = format!(
            "playbin uri=\"{}\" video-sink=\"videoscale ! videoconvert ! appsink name=gpui_video drop=true caps=video/x-raw,format=NV12,pixel-aspect-ratio=1/1\"",
            uri.as_str()
        );
        let pipeline = gst::parse::launch(pipeline.as_ref())?
            .downcast::<gst::Pipeline>()
            .map_err(|_| Error::Cast)?;

        let video_sink: gst::Element = pipeline.property("video-sink");
        let bin = video_sink
            .pads()
            .first()
            .cloned()
            .and_then(|pad| pad.dynamic_cast::<gst::GhostPad>().ok())
            .and_then(|pad| pad.parent_element())
            .and_then(|parent| parent.downcast::<gst::Bin>().ok())
            .ok_or(Error::Cast)?;
        let video_sink = bin
            .by_name("gpui_video")
            .and_then(|sink| sink.downcast::<gst_app::AppSink>().ok())
            .ok_or(Error::Cast)?;

        Self::from_gst_pipeline(pipeline, video_sink)
    }

    /// Wrap an existing pipeline whose frames arrive at `video_sink` as NV12.
    pub fn from_gst_pipeline(
        pipeline: gst::Pipeline,
        video_sink: gst_app::AppSink,
    ) -> Result<Self, Error> {
        gst::init()?;

        macro_rules! cleanup {
            ($expr:expr) => {
                $expr.map_err(|e| {
                    let _ = pipeline.set_state(gst::State::Null);
                    e
                })
            };
        }

        let pad = cleanup!(video_sink.static_pad("sink").ok_or(Error::Caps))?;

        // Preroll only; playback starts on the first play request.
        cleanup!(pipeline.set_state(gst::State::Paused))?;
        cleanup!(pipeline.state(gst::ClockTime::from_seconds(5)).0)?;

        let caps = cleanup!(pad.current_caps().ok_or(Error::Caps))?;
        let info = cleanup!(gst_video::VideoInfo::from_caps(&caps).map_err(|_| Error::Caps))?;
        let bus = cleanup!(pipeline.bus().ok_or(Error::Bus))?;

        let signals = SignalHub::new();
        if let Some(duration) = pipeline.query_duration::<gst::ClockTime>() {
            signals.emit(MediaSignal::MetadataLoaded {
                duration: clock_to_seconds(duration),
            });
        }

        let frame = Arc::new(Mutex::new(Frame::empty()));
        let upload_frame = Arc::new(AtomicBool::new(false));
        let alive = Arc::new(AtomicBool::new(true));
        let is_eos = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            pipeline: pipeline.clone(),
            bus,
            sink: video_sink,
            alive: Arc::clone(&alive),
            frame: Arc::clone(&frame),
            upload_frame: Arc::clone(&upload_frame),
            is_eos: Arc::clone(&is_eos),
            signals: Arc::clone(&signals),
        };
        let worker = cleanup!(
            std::thread::Builder::new()
                .name("gpui-video-overlay".into())
                .spawn(move || worker.run())
        )?;

        log::debug!(
            "opened video {}x{}, duration {:?}",
            info.width(),
            info.height(),
            pipeline.query_duration::<gst::ClockTime>()
        );

        Ok(Video(Arc::new(RwLock::new(Internal {
            source: pipeline,
            alive,
            worker: Some(worker),

            width: info.width(),
            height: info.height(),

            frame,
            upload_frame,
            is_eos,
            fullscreen_requested: AtomicBool::new(false),

            signals,
        }))))
    }

    pub(crate) fn read(&self) -> parking_lot::RwLockReadGuard<'_, Internal> {
        self.0.read()
    }

    /// Get the size/resolution of the video as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        let inner = self.read();
        (inner.width, inner.height)
    }

    /// Get if the stream ended or not.
    pub fn eos(&self) -> bool {
        self.read().is_eos.load(Ordering::SeqCst)
    }

    /// Get if the media is paused or not.
    pub fn paused(&self) -> bool {
        self.read().paused()
    }

    /// Consume the "new frame decoded" flag.
    pub fn take_frame_ready(&self) -> bool {
        self.read().upload_frame.swap(false, Ordering::SeqCst)
    }

    /// Get the current NV12 frame data as `(bytes, width, height)` if available.
    pub fn current_frame_data(&self) -> Option<(Vec<u8>, u32, u32)> {
        let inner = self.read();
        let frame = inner.frame.lock();
        let readable = frame.readable()?;
        let data = readable.as_slice().to_vec();
        (!data.is_empty()).then_some((data, inner.width, inner.height))
    }
}

impl MediaSurface for Video {
    fn play(&self) {
        self.read().play();
    }

    fn pause(&self) {
        self.read().set_state(gst::State::Paused);
    }

    fn seek(&self, seconds: f64) {
        self.read().seek(seconds);
    }

    fn set_volume(&self, level: f64) {
        self.read().source.set_property("volume", level);
    }

    fn supports_fullscreen(&self) -> bool {
        true
    }

    fn request_fullscreen(&self) {
        self.read()
            .fullscreen_requested
            .store(true, Ordering::SeqCst);
    }

    fn subscribe(&self, kind: SignalKind, listener: Listener) -> Subscription {
        self.read().signals.subscribe(kind, listener)
    }
}

impl MediaView for Video {
    fn natural_size(&self) -> (u32, u32) {
        self.size()
    }

    fn take_fullscreen_request(&self) -> bool {
        self.read().fullscreen_requested.swap(false, Ordering::SeqCst)
    }

    fn media_element(&self, width: Pixels, height: Pixels) -> AnyElement {
        video(self.clone())
            .id("video-frame")
            .size(width, height)
            .into_any_element()
    }
}
