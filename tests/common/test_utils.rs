use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use retro_pc::{
    assembler::assemble,
    catalog::Variant,
    config::CameraSettings,
    data_structures::instance::Instance,
    driver::{RenderSurface, Stage},
    media::{MediaSource, MediaStatus, ScreenFeed, TextureHandle},
};

/// What the surface saw when it was asked to draw.
#[derive(Clone, Debug)]
pub(crate) struct DrawRecord {
    pub root: Instance,
    pub aspect: f32,
}

/// A render surface that only records what it is asked to do.
#[derive(Debug)]
pub(crate) struct FakeSurface {
    size: (u32, u32),
    pub draws: Vec<DrawRecord>,
    pub resizes: Vec<(u32, u32)>,
    pub pending_errors: VecDeque<wgpu::SurfaceError>,
    /// Polled once per draw, the way the window surface refreshes its screen.
    pub feed: Option<ScreenFeed>,
    pub frames_shown: u64,
}

impl FakeSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            draws: Vec::new(),
            resizes: Vec::new(),
            pending_errors: VecDeque::new(),
            feed: None,
            frames_shown: 0,
        }
    }

    pub fn with_feed(mut self, feed: ScreenFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Make the next `draw` fail with `error` instead of recording.
    pub fn fail_next_draw(&mut self, error: wgpu::SurfaceError) {
        self.pending_errors.push_back(error);
    }
}

impl RenderSurface for FakeSurface {
    fn draw(&mut self, stage: &Stage) -> Result<(), wgpu::SurfaceError> {
        if let Some(error) = self.pending_errors.pop_front() {
            return Err(error);
        }
        if let Some(feed) = &mut self.feed {
            let (width, height) = screen_handle_size();
            if feed.poll(width, height).is_some() {
                self.frames_shown += 1;
            }
        }
        self.draws.push(DrawRecord {
            root: stage.composite.root_transform().clone(),
            aspect: stage.projection.aspect(),
        });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.resizes.push((width, height));
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// A media source whose status and frames are scripted from the outside.
#[derive(Clone)]
pub(crate) struct ScriptedSource {
    pub status: Rc<RefCell<MediaStatus>>,
    pub frames: Rc<RefCell<VecDeque<image::RgbaImage>>>,
}

impl ScriptedSource {
    pub fn new(status: MediaStatus) -> Self {
        Self {
            status: Rc::new(RefCell::new(status)),
            frames: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn set_status(&self, status: MediaStatus) {
        *self.status.borrow_mut() = status;
    }

    pub fn push_frame(&self, width: u32, height: u32, rgba: [u8; 4]) {
        self.frames
            .borrow_mut()
            .push_back(image::RgbaImage::from_pixel(width, height, image::Rgba(rgba)));
    }
}

impl MediaSource for ScriptedSource {
    fn status(&self) -> MediaStatus {
        self.status.borrow().clone()
    }

    fn next_frame(&mut self, _: u32, _: u32) -> Option<image::RgbaImage> {
        self.frames.borrow_mut().pop_front()
    }
}

pub(crate) fn screen_handle() -> TextureHandle {
    let (width, height) = screen_handle_size();
    TextureHandle::new(width, height)
}

pub(crate) fn screen_handle_size() -> (u32, u32) {
    (64, 48)
}

/// The default camera looking at a freshly assembled `variant`.
pub(crate) fn stage(variant: Variant, width: u32, height: u32) -> Stage {
    let composite = assemble(variant.parts(), &screen_handle())
        .expect("built-in catalogs are well formed");
    let camera = CameraSettings::default();
    Stage {
        composite,
        camera: camera.camera(),
        projection: camera.projection(width, height),
    }
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {} to be within 1e-5 of {}",
        actual,
        expected
    );
}

/// Yaw of an instance whose rotation is purely about the Y axis.
pub(crate) fn yaw_of(instance: &Instance) -> f32 {
    let q = instance.rotation;
    2.0 * q.v.y.atan2(q.s)
}
