//! The screen's media collaborator.
//!
//! A [`MediaSource`] produces RGBA frames on its own schedule (a playing
//! `<video>` element on the web, a poster image natively). Once per tick the
//! [`ScreenFeed`] asks it for the newest frame and the [`ScreenTexture`]
//! uploads it. A source that fails is reported once and then simply never
//! yields frames again: the screen keeps its last image, or stays black.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::{data_structures::texture::Texture, error::AssetLoadFailure};

mod still;
#[cfg(target_arch = "wasm32")]
mod video;

pub use still::StillImageSource;
#[cfg(target_arch = "wasm32")]
pub use video::VideoElementSource;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaStatus {
    Loading,
    Ready,
    Failed(AssetLoadFailure),
}

impl MediaStatus {
    /// `Loading` becomes `Ready`. Returns whether that happened; a failed
    /// source stays failed.
    pub fn mark_loaded(&mut self) -> bool {
        if *self == MediaStatus::Loading {
            *self = MediaStatus::Ready;
            true
        } else {
            false
        }
    }
}

pub trait MediaSource {
    fn status(&self) -> MediaStatus;

    /// The newest decoded frame scaled to `width` x `height`, or `None` if
    /// nothing changed since the last call.
    fn next_frame(&mut self, width: u32, height: u32) -> Option<image::RgbaImage>;
}

/// Stand-in for a source that could not even be created.
#[derive(Debug)]
pub struct Unavailable(pub AssetLoadFailure);

impl MediaSource for Unavailable {
    fn status(&self) -> MediaStatus {
        MediaStatus::Failed(self.0.clone())
    }

    fn next_frame(&mut self, _: u32, _: u32) -> Option<image::RgbaImage> {
        None
    }
}

static NEXT_TEXTURE_ID: AtomicU32 = AtomicU32::new(1);

/// Identifies the texture the display surface samples from.
///
/// The handle is what the assembler binds; the pixels live in the
/// [`ScreenTexture`] that issued it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    id: u32,
    width: u32,
    height: u32,
}

impl TextureHandle {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Pulls frames out of a [`MediaSource`] and never fails doing so.
pub struct ScreenFeed {
    source: Box<dyn MediaSource>,
    failure_reported: bool,
    frames_delivered: u64,
}

impl ScreenFeed {
    pub fn new(source: Box<dyn MediaSource>) -> Self {
        Self {
            source,
            failure_reported: false,
            frames_delivered: 0,
        }
    }

    pub fn status(&self) -> MediaStatus {
        self.source.status()
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }

    pub fn failure_reported(&self) -> bool {
        self.failure_reported
    }

    pub fn poll(&mut self, width: u32, height: u32) -> Option<image::RgbaImage> {
        match self.source.status() {
            MediaStatus::Failed(failure) => {
                if !self.failure_reported {
                    log::error!("{}. The screen keeps its last frame.", failure);
                    self.failure_reported = true;
                }
                None
            }
            MediaStatus::Loading => None,
            MediaStatus::Ready => {
                let frame = self.source.next_frame(width, height)?;
                if frame.dimensions() != (width, height) {
                    log::warn!(
                        "dropping a {:?} frame, the screen expects {}x{}",
                        frame.dimensions(),
                        width,
                        height
                    );
                    return None;
                }
                if self.frames_delivered == 0 {
                    log::debug!("first screen frame delivered");
                }
                self.frames_delivered += 1;
                Some(frame)
            }
        }
    }
}

impl std::fmt::Debug for ScreenFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenFeed")
            .field("status", &self.source.status())
            .field("failure_reported", &self.failure_reported)
            .field("frames_delivered", &self.frames_delivered)
            .finish()
    }
}

/// The GPU texture behind a [`TextureHandle`]. Starts out black.
#[derive(Debug)]
pub struct ScreenTexture {
    handle: TextureHandle,
    texture: Texture,
}

impl ScreenTexture {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) -> Self {
        let texture = Texture::create_solid(
            device,
            queue,
            width,
            height,
            [0, 0, 0, 255],
            "screen texture",
        );
        Self {
            handle: TextureHandle::new(width, height),
            texture,
        }
    }

    pub fn handle(&self) -> &TextureHandle {
        &self.handle
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Upload the newest frame of `feed`, if there is one.
    pub fn refresh(&self, queue: &wgpu::Queue, feed: &mut ScreenFeed) {
        let (width, height) = self.handle.size();
        if let Some(frame) = feed.poll(width, height) {
            if let Err(e) = self.texture.write_frame(queue, &frame) {
                log::warn!("screen frame skipped: {}", e);
            }
        }
    }
}

/// Open the media source for this platform.
///
/// Natively the screen shows `poster` from the assets folder, on the web the
/// looping video at `video_url`. Failures are folded into an [`Unavailable`]
/// source so that startup goes on.
#[allow(unused_variables)]
pub async fn open_source(video_url: &str, poster: &str) -> Box<dyn MediaSource> {
    #[cfg(not(target_arch = "wasm32"))]
    let source = StillImageSource::load(poster).await;
    #[cfg(target_arch = "wasm32")]
    let source = VideoElementSource::new(video_url);

    match source {
        Ok(source) => Box::new(source),
        Err(failure) => Box::new(Unavailable(failure)),
    }
}
