//! Application event loop.
//!
//! The winit [`ApplicationHandler`] owns the [`Viewer`] once it exists and
//! translates window events into the viewer's two entry points:
//!
//! - `RedrawRequested` becomes [`Viewer::on_frame`]; drawing requests the next
//!   redraw, so the loop runs at the display's refresh rate
//! - `Resized` becomes [`Viewer::on_resize`]
//!
//! Startup is async (adapter, device, media source). Natively it blocks on a
//! tokio runtime, on the web it is spawned and reports back through the event
//! loop proxy. A malformed part catalog aborts startup; natively [`run`]
//! returns that error.

use std::{fmt::Debug, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    assembler::assemble,
    config::ViewerConfig,
    context::Context,
    driver::{Stage, Viewer},
    media::{ScreenFeed, ScreenTexture, open_source},
    render::{SceneRenderer, WgpuSurface},
};

/// Build everything the viewer needs, in dependency order: GPU context,
/// screen texture, composite, renderer and finally the media source.
pub async fn init_viewer(
    window: Arc<Window>,
    config: ViewerConfig,
) -> anyhow::Result<Viewer<WgpuSurface>> {
    let ctx = Context::new(window).await?;
    let (width, height) = ctx.size();
    config.check_limits(&ctx.device.limits())?;

    let (screen_width, screen_height) = config.screen_resolution;
    let screen = ScreenTexture::new(&ctx.device, &ctx.queue, screen_width, screen_height);
    let composite = assemble(config.variant.parts(), screen.handle())?;
    log::info!(
        "{} variant assembled with {} parts",
        config.variant,
        composite.len()
    );

    let stage = Stage {
        composite,
        camera: config.camera.camera(),
        projection: config.camera.projection(width, height),
    };
    let renderer = SceneRenderer::new(
        &ctx.device,
        &ctx.queue,
        ctx.config.format,
        (width, height),
        &stage,
        screen,
        &config,
    )?;

    log::info!("screen source: {}", config.video_url());
    let source = open_source(config.video_url(), &config.poster).await;
    let surface = WgpuSurface::new(ctx, renderer, ScreenFeed::new(source));
    Ok(Viewer::new(stage, surface, config.oscillation))
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(Box<Viewer<WgpuSurface>>),
    #[allow(dead_code)]
    Failed(anyhow::Error),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized(Viewer)"),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: ViewerConfig,
    started: bool,
    viewer: Option<Viewer<WgpuSurface>>,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: ViewerConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            started: false,
            viewer: None,
            fatal: None,
        })
    }

    fn start(&mut self, mut viewer: Viewer<WgpuSurface>) {
        // Important: Trigger a resize and redraw now that we are initialized
        let size = viewer.surface.context().window().inner_size();
        viewer.on_resize(size.width, size.height);
        viewer.surface.context().window().request_redraw();
        self.viewer = Some(viewer);
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("App initialization failed: {:#}", error);
        self.fatal = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Retro PC");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = wgpu::web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            window_attributes = match canvas {
                Some(canvas) => window_attributes.with_canvas(Some(canvas.unchecked_into())),
                None => window_attributes.with_append(true),
            };
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.abort(event_loop, e.into()),
        };

        let init_future = init_viewer(window, self.config.clone());

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok(viewer) => self.start(viewer),
                Err(e) => self.abort(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok(viewer) => FlowEvent::Initialized(Box::new(viewer)),
                    Err(e) => FlowEvent::Failed(e),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("event loop closed before the viewer was ready");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized(viewer) => self.start(*viewer),
            FlowEvent::Failed(e) => self.abort(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let viewer = match &mut self.viewer {
            Some(viewer) => viewer,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => viewer.on_resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                viewer.on_frame(Instant::now());
            }
            _ => {}
        }
    }
}

/// Open a window and run the viewer until it is closed.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {}", e).into());
        }
    }

    log::info!("starting viewer: {:?}", config.variant);
    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
