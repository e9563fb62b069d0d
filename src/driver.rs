//! Per-frame update and the viewport resize contract.
//!
//! The host calls [`Viewer::on_frame`] once per display refresh and
//! [`Viewer::on_resize`] whenever the viewport changes. Neither ever fails:
//! surface errors are logged or recovered from, and the next frame simply
//! comes when the host delivers it.

use instant::{Duration, Instant};

use crate::{
    camera::{Camera, Projection},
    data_structures::scene_graph::CompositeObject,
};

/// Sinusoidal swing of the composite about its vertical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillation {
    /// Peak angle in radians.
    pub amplitude: f32,
    /// Angular frequency in radians per second.
    pub omega: f32,
}

impl Oscillation {
    pub fn angle(&self, elapsed: Duration) -> f32 {
        self.amplitude * (self.omega * elapsed.as_secs_f32()).sin()
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f32(std::f32::consts::TAU / self.omega)
    }
}

impl Default for Oscillation {
    fn default() -> Self {
        Self {
            amplitude: 0.15,
            omega: 1.0,
        }
    }
}

/// Rasterizes the stage and follows the viewport size.
pub trait RenderSurface {
    fn draw(&mut self, stage: &Stage) -> Result<(), wgpu::SurfaceError>;

    fn resize(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);
}

/// Everything a frame is made of: the composite and how it is looked at.
#[derive(Clone, Debug)]
pub struct Stage {
    pub composite: CompositeObject,
    pub camera: Camera,
    pub projection: Projection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running { origin: Instant, ticks: u64 },
}

#[derive(Debug)]
pub struct FrameDriver {
    oscillation: Oscillation,
    state: DriverState,
}

impl FrameDriver {
    pub fn new(oscillation: Oscillation) -> Self {
        Self {
            oscillation,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running { .. })
    }

    pub fn ticks(&self) -> u64 {
        match self.state {
            DriverState::Idle => 0,
            DriverState::Running { ticks, .. } => ticks,
        }
    }

    pub fn oscillation(&self) -> &Oscillation {
        &self.oscillation
    }

    /// Swing the composite and draw one frame.
    ///
    /// The first tick captures the time origin. Returns the applied angle.
    pub fn tick<S: RenderSurface>(&mut self, now: Instant, stage: &mut Stage, surface: &mut S) -> f32 {
        let (origin, ticks) = match self.state {
            DriverState::Idle => {
                log::debug!("frame driver running");
                (now, 0)
            }
            DriverState::Running { origin, ticks } => (origin, ticks),
        };
        self.state = DriverState::Running {
            origin,
            ticks: ticks + 1,
        };

        let elapsed = if now > origin {
            now.duration_since(origin)
        } else {
            Duration::ZERO
        };
        let angle = self.oscillation.angle(elapsed);
        stage.composite.set_yaw(angle);

        match surface.draw(stage) {
            Ok(()) => (),
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = surface.size();
                log::warn!("render surface lost, reconfiguring at {}x{}", width, height);
                surface.resize(width, height);
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
        angle
    }

    /// Apply a new viewport size right away: aspect, projection, surface.
    pub fn resize<S: RenderSurface>(&mut self, stage: &mut Stage, surface: &mut S, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {}x{}", width, height);
            return;
        }
        stage.projection.resize(width, height);
        surface.resize(width, height);
    }
}

/// The explicit context object: created once at startup, owned by the host.
pub struct Viewer<S: RenderSurface> {
    pub stage: Stage,
    pub surface: S,
    pub driver: FrameDriver,
}

impl<S: RenderSurface> Viewer<S> {
    pub fn new(stage: Stage, surface: S, oscillation: Oscillation) -> Self {
        Self {
            stage,
            surface,
            driver: FrameDriver::new(oscillation),
        }
    }

    pub fn on_frame(&mut self, now: Instant) -> f32 {
        self.driver.tick(now, &mut self.stage, &mut self.surface)
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.driver
            .resize(&mut self.stage, &mut self.surface, width, height);
    }
}
