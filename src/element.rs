use crate::video::Video;
use gpui::{
    Bounds, Element, ElementId, GlobalElementId, InspectorElementId, IntoElement, LayoutId,
    Pixels, Window, px,
};
use yuv::{YuvBiPlanarImage, YuvConversionMode, YuvRange, YuvStandardMatrix, yuv_nv12_to_rgba};

/// Paints the current frame of a [`Video`], letterboxed inside the element's bounds.
pub struct VideoElement {
    video: Video,
    display_width: Option<Pixels>,
    display_height: Option<Pixels>,
    element_id: Option<ElementId>,
}

impl VideoElement {
    pub fn new(video: Video) -> Self {
        Self {
            video,
            display_width: None,
            display_height: None,
            element_id: None,
        }
    }

    pub fn id(mut self, id: impl Into<ElementId>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    pub fn size(mut self, width: Pixels, height: Pixels) -> Self {
        self.display_width = Some(width);
        self.display_height = Some(height);
        self
    }

    /// Requested display size, falling back to the video's natural size.
    fn display_size(&self) -> (Pixels, Pixels) {
        match (self.display_width, self.display_height) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                let (width, height) = self.video.size();
                (px(width as f32), px(height as f32))
            }
        }
    }
}

/// Largest rectangle with the frame's aspect ratio centred in `bounds`.
pub(crate) fn fit_contain(bounds: Bounds<Pixels>, width: u32, height: u32) -> Bounds<Pixels> {
    if width == 0 || height == 0 {
        return bounds;
    }
    let frame_width = px(width as f32);
    let frame_height = px(height as f32);
    let scale = (bounds.size.width / frame_width).min(bounds.size.height / frame_height);
    let size = gpui::size(frame_width * scale, frame_height * scale);
    let origin = gpui::point(
        bounds.origin.x + (bounds.size.width - size.width) / 2.,
        bounds.origin.y + (bounds.size.height - size.height) / 2.,
    );
    Bounds::new(origin, size)
}

/// Whether to schedule another frame: continuously while playing, once for a frame decoded while
/// paused or after the stream ended, never otherwise.
fn wants_next_frame(eos: bool, paused: bool, frame_ready: bool) -> bool {
    frame_ready || (!eos && !paused)
}

/// Convert an NV12 frame to BGRA, the pixel order gpui images use.
fn nv12_to_bgra(nv12: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let y_size = width as usize * height as usize;
    let uv_size = y_size / 2;
    if nv12.len() < y_size + uv_size {
        return None;
    }

    let image = YuvBiPlanarImage {
        y_plane: &nv12[..y_size],
        y_stride: width,
        uv_plane: &nv12[y_size..y_size + uv_size],
        uv_stride: width,
        width,
        height,
    };

    let mut pixels = vec![0u8; y_size * 4];
    let converted = yuv_nv12_to_rgba(
        &image,
        &mut pixels,
        width * 4,
        YuvRange::Limited,
        YuvStandardMatrix::Bt709,
        YuvConversionMode::Balanced,
    )
    .or_else(|_| {
        yuv_nv12_to_rgba(
            &image,
            &mut pixels,
            width * 4,
            YuvRange::Limited,
            YuvStandardMatrix::Bt601,
            YuvConversionMode::Balanced,
        )
    });
    if let Err(err) = converted {
        log::warn!("failed to convert frame: {err:?}");
        return None;
    }

    for pixel in pixels.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    Some(pixels)
}

impl Element for VideoElement {
    type RequestLayoutState = ();
    type PrepaintState = ();

    fn id(&self) -> Option<ElementId> {
        self.element_id.clone()
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        window: &mut Window,
        cx: &mut gpui::App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let (width, height) = self.display_size();

        let style = gpui::Style {
            size: gpui::Size {
                width: gpui::Length::Definite(gpui::DefiniteLength::Absolute(
                    gpui::AbsoluteLength::Pixels(width),
                )),
                height: gpui::Length::Definite(gpui::DefiniteLength::Absolute(
                    gpui::AbsoluteLength::Pixels(height),
                )),
            },
            ..Default::default()
        };

        (window.request_layout(style, [], cx), ())
    }

    fn prepaint(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        _bounds: Bounds<Pixels>,
        _request_layout_state: &mut Self::RequestLayoutState,
        window: &mut Window,
        _cx: &mut gpui::App,
    ) -> Self::PrepaintState {
        let frame_ready = self.video.take_frame_ready();
        if wants_next_frame(self.video.eos(), self.video.paused(), frame_ready) {
            window.request_animation_frame();
        }
    }

    fn paint(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout_state: &mut Self::RequestLayoutState,
        _prepaint_state: &mut Self::PrepaintState,
        window: &mut Window,
        _cx: &mut gpui::App,
    ) {
        use image::{ImageBuffer, Rgba};
        use smallvec::SmallVec;

        window.paint_quad(gpui::fill(bounds, gpui::black()));

        let Some((nv12, width, height)) = self.video.current_frame_data() else {
            return;
        };
        let Some(pixels) = nv12_to_bgra(&nv12, width, height) else {
            return;
        };
        let Some(buffer) = ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, pixels) else {
            return;
        };

        let frames: SmallVec<[image::Frame; 1]> = SmallVec::from_elem(image::Frame::new(buffer), 1);
        let render_image = std::sync::Arc::new(gpui::RenderImage::new(frames));

        if let Err(err) = window.paint_image(
            fit_contain(bounds, width, height),
            gpui::Corners::default(),
            render_image,
            0,
            false,
        ) {
            log::warn!("failed to paint video frame: {err}");
        }
    }
}

impl IntoElement for VideoElement {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

/// Helper function to create a video element.
pub fn video(video: Video) -> VideoElement {
    VideoElement::new(video)
}
