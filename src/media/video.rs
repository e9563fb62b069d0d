use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{JsCast, closure::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement};

use crate::{
    error::AssetLoadFailure,
    media::{MediaSource, MediaStatus},
};

// HTMLMediaElement.HAVE_CURRENT_DATA
const HAVE_CURRENT_DATA: u16 = 2;

/**
 * A looping, muted, inline `<video>` element.
 *
 * Frames are scaled into an offscreen 2D canvas and read back as RGBA. This
 * requires the video to be served with CORS headers, otherwise the canvas is
 * tainted and reading it fails with a security error, which is reported as a
 * decode failure.
 */
pub struct VideoElementSource {
    url: String,
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    status: Rc<RefCell<MediaStatus>>,
    _on_loaded: Closure<dyn FnMut(web_sys::Event)>,
    _on_error: Closure<dyn FnMut(web_sys::Event)>,
}

impl VideoElementSource {
    pub fn new(url: &str) -> Result<Self, AssetLoadFailure> {
        let fetch_failure = |reason: String| AssetLoadFailure::Fetch {
            url: url.to_string(),
            reason,
        };
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| fetch_failure("no document to create a video element in".into()))?;

        let video: HtmlVideoElement = document
            .create_element("video")
            .map_err(|e| fetch_failure(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| fetch_failure("created element is not a video".into()))?;
        video.set_cross_origin(Some("anonymous"));
        video.set_loop(true);
        video.set_muted(true);
        video
            .set_attribute("playsinline", "")
            .map_err(|e| fetch_failure(format!("{:?}", e)))?;

        let status = Rc::new(RefCell::new(MediaStatus::Loading));

        let on_loaded = {
            let status = status.clone();
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                if status.borrow_mut().mark_loaded() {
                    log::info!("Video loaded successfully!");
                }
            })
        };
        let on_error = {
            let status = status.clone();
            let url = url.to_string();
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                *status.borrow_mut() = MediaStatus::Failed(AssetLoadFailure::Fetch {
                    url: url.clone(),
                    reason: "the browser could not load the video".to_string(),
                });
            })
        };
        video
            .add_event_listener_with_callback("loadeddata", on_loaded.as_ref().unchecked_ref())
            .map_err(|e| fetch_failure(format!("{:?}", e)))?;
        video
            .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
            .map_err(|e| fetch_failure(format!("{:?}", e)))?;

        video.set_src(url);
        match video.play() {
            Ok(promise) => {
                let url = url.to_string();
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        let failure = AssetLoadFailure::Playback {
                            url,
                            reason: format!("{:?}", e),
                        };
                        log::error!("{}", failure);
                    }
                });
            }
            Err(e) => log::error!("Video play error: {:?}", e),
        }

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| fetch_failure(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| fetch_failure("created element is not a canvas".into()))?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|context| context.dyn_into().ok())
            .ok_or_else(|| fetch_failure("no 2d canvas context for frame readback".into()))?;

        log::info!("loading video {}", url);
        Ok(Self {
            url: url.to_string(),
            video,
            canvas,
            context,
            status,
            _on_loaded: on_loaded,
            _on_error: on_error,
        })
    }
}

impl MediaSource for VideoElementSource {
    fn status(&self) -> MediaStatus {
        self.status.borrow().clone()
    }

    fn next_frame(&mut self, width: u32, height: u32) -> Option<image::RgbaImage> {
        if *self.status.borrow() != MediaStatus::Ready
            || self.video.ready_state() < HAVE_CURRENT_DATA
        {
            return None;
        }
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        let (w, h) = (width as f64, height as f64);
        self.context
            .draw_image_with_html_video_element_and_dw_and_dh(&self.video, 0.0, 0.0, w, h)
            .ok()?;
        match self.context.get_image_data(0.0, 0.0, w, h) {
            Ok(data) => image::RgbaImage::from_raw(width, height, data.data().0),
            Err(e) => {
                *self.status.borrow_mut() = MediaStatus::Failed(AssetLoadFailure::Decode {
                    url: self.url.clone(),
                    reason: format!("{:?}", e),
                });
                None
            }
        }
    }
}
