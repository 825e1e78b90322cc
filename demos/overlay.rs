use gpui::{
    App, Application, Context, Entity, MouseButton, Render, Window, WindowOptions, div,
    prelude::*, rgb,
};
use gpui_video_overlay::{Video, VideoOverlay, VideoOverlayEvent};
use std::path::PathBuf;
use url::Url;

struct OverlayDemo {
    overlay: Entity<VideoOverlay>,
}

impl OverlayDemo {
    fn new(video: Video, title: String, cx: &mut Context<Self>) -> Self {
        let overlay = cx.new(|_| VideoOverlay::new(video, title));
        cx.subscribe(&overlay, |_this, overlay, event: &VideoOverlayEvent, cx| match event {
            VideoOverlayEvent::CloseRequested => {
                overlay.update(cx, |overlay, cx| overlay.set_show(false, cx));
            }
        })
        .detach();
        Self { overlay }
    }
}

impl Render for OverlayDemo {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let shown = self.overlay.read(cx).is_shown();

        div()
            .size_full()
            .relative()
            .bg(rgb(0x2d2d2d))
            .flex()
            .items_center()
            .justify_center()
            .when(!shown, |this| {
                this.child(
                    div()
                        .px_4()
                        .py_2()
                        .bg(rgb(0x404040))
                        .text_color(rgb(0xffffff))
                        .rounded_md()
                        .cursor_pointer()
                        .on_mouse_down(
                            MouseButton::Left,
                            cx.listener(|this, _, _window, cx| {
                                this.overlay
                                    .update(cx, |overlay, cx| overlay.set_show(true, cx));
                            }),
                        )
                        .child("Open video"),
                )
            })
            .child(self.overlay.clone())
    }
}

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/test.mp4"));
    let path = path.canonicalize().expect("video file not found");
    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let uri = Url::from_file_path(&path).expect("invalid file path");

    Application::new().run(move |cx: &mut App| {
        gpui_component::init(cx);
        cx.open_window(
            WindowOptions {
                focus: true,
                ..Default::default()
            },
            |_, cx| {
                let video = Video::new(&uri).expect("failed to open video");
                cx.new(|cx| OverlayDemo::new(video, title.clone(), cx))
            },
        )
        .expect("failed to open window");
        cx.activate(true);
    });
}
