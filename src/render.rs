//! GPU side of the viewer.
//!
//! [`GpuComposite`] mirrors a [`CompositeObject`] on the GPU: one mesh,
//! material and instance buffer per part. [`SceneRenderer`] owns everything a
//! frame needs (pipeline, uniforms, depth buffer, screen texture) and records
//! the frame into any colour target. [`WgpuSurface`] puts the renderer behind
//! a window and implements [`RenderSurface`] for the frame driver.
//!

use std::iter;

use wgpu::util::DeviceExt;

use crate::{
    camera::CameraResources,
    config::ViewerConfig,
    context::Context,
    data_structures::{
        model::{self, DrawModel, Material, MaterialUniform, Mesh},
        scene_graph::{CompositeObject, MaterialBinding},
        texture::Texture,
    },
    driver::{RenderSurface, Stage},
    error::{DescriptorProblem, MalformedDescriptor},
    media::{ScreenFeed, ScreenTexture},
    pipelines::{basic::mk_part_pipeline, light::LightResources},
    resources::mesh::{Geometry, upload_mesh},
};

/// One uploaded part: geometry, material and its single instance.
#[derive(Debug)]
pub struct GpuPart {
    pub name: &'static str,
    pub mesh: Mesh,
    pub material: Material,
    pub instance_buffer: wgpu::Buffer,
}

#[derive(Debug)]
pub struct GpuComposite {
    parts: Vec<GpuPart>,
}

impl GpuComposite {
    /// Upload every part of `composite` once.
    ///
    /// Flat parts sample `white` tinted by their colour, the display surface
    /// samples `screen`. A display surface bound to any other texture is
    /// rejected.
    pub fn new(
        device: &wgpu::Device,
        material_layout: &wgpu::BindGroupLayout,
        white: &Texture,
        screen: &ScreenTexture,
        composite: &CompositeObject,
    ) -> Result<Self, MalformedDescriptor> {
        let parts = composite
            .children()
            .iter()
            .map(|node| {
                let material = match &node.material {
                    MaterialBinding::Flat(color) => Material::new(
                        device,
                        node.name,
                        white,
                        MaterialUniform::lit(color.to_linear()),
                        material_layout,
                    ),
                    MaterialBinding::Texture(handle) => {
                        if handle != screen.handle() {
                            return Err(MalformedDescriptor::new(
                                node.name,
                                DescriptorProblem::UnknownTexture {
                                    expected: screen.handle().id(),
                                    found: handle.id(),
                                },
                            ));
                        }
                        Material::new(
                            device,
                            node.name,
                            screen.texture(),
                            MaterialUniform::unlit(),
                            material_layout,
                        )
                    }
                };
                let mesh = upload_mesh(device, node.name, &Geometry::for_shape(&node.shape));
                let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Instance Buffer", node.name)),
                    contents: bytemuck::cast_slice(&[node.world_transform().to_raw()]),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
                Ok(GpuPart {
                    name: node.name,
                    mesh,
                    material,
                    instance_buffer,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[GpuPart] {
        &self.parts
    }

    /// Push the current world transforms. Parts are matched by position, the
    /// composite never changes its children after assembly.
    pub fn write_to_buffers(&self, queue: &wgpu::Queue, composite: &CompositeObject) {
        self.parts
            .iter()
            .zip(composite.children())
            .for_each(|(part, node)| {
                queue.write_buffer(
                    &part.instance_buffer,
                    0,
                    bytemuck::cast_slice(&[node.world_transform().to_raw()]),
                );
            });
    }

    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    ) {
        for part in &self.parts {
            render_pass.set_vertex_buffer(1, part.instance_buffer.slice(..));
            render_pass.draw_mesh_instanced(
                &part.mesh,
                &part.material,
                0..1,
                camera_bind_group,
                light_bind_group,
            );
        }
    }
}

/// Records one frame of the stage into a colour target.
#[derive(Debug)]
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    camera: CameraResources,
    light: LightResources,
    depth_texture: Texture,
    screen: ScreenTexture,
    composite: GpuComposite,
    clear_colour: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        size: (u32, u32),
        stage: &Stage,
        screen: ScreenTexture,
        config: &ViewerConfig,
    ) -> Result<Self, MalformedDescriptor> {
        let camera = CameraResources::new(device, &stage.camera, &stage.projection);
        let light = LightResources::new(device, &config.lighting);
        let material_layout = model::material_layout(device);
        let pipeline = mk_part_pipeline(
            device,
            color_format,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );

        let white = Texture::create_solid(device, queue, 1, 1, [255; 4], "white texture");
        let composite = GpuComposite::new(device, &material_layout, &white, &screen, &stage.composite)?;
        let depth_texture = Texture::create_depth_texture(device, [size.0, size.1], "depth_texture");
        log::info!(
            "uploaded {} parts, screen texture {}x{}",
            composite.parts().len(),
            screen.texture().width(),
            screen.texture().height()
        );

        Ok(Self {
            pipeline,
            camera,
            light,
            depth_texture,
            screen,
            composite,
            clear_colour: config.clear_colour.to_wgpu(),
        })
    }

    pub fn screen(&self) -> &ScreenTexture {
        &self.screen
    }

    pub fn clear_colour(&self) -> wgpu::Color {
        self.clear_colour
    }

    /// Upload what changed since the last frame: camera and part transforms.
    pub fn prepare(&mut self, queue: &wgpu::Queue, stage: &Stage) {
        self.camera
            .write_to_buffer(queue, &stage.camera, &stage.projection);
        self.composite.write_to_buffers(queue, &stage.composite);
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture =
            Texture::create_depth_texture(device, [width, height], "depth_texture");
    }

    /// Record the frame into `view`. The depth buffer must match its size.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        self.composite
            .draw(&mut render_pass, &self.camera.bind_group, &self.light.bind_group);
    }
}

/// The window-backed render surface.
pub struct WgpuSurface {
    ctx: Context,
    renderer: SceneRenderer,
    feed: ScreenFeed,
}

impl WgpuSurface {
    pub fn new(ctx: Context, renderer: SceneRenderer, feed: ScreenFeed) -> Self {
        Self {
            ctx,
            renderer,
            feed,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn feed(&self) -> &ScreenFeed {
        &self.feed
    }
}

impl RenderSurface for WgpuSurface {
    fn draw(&mut self, stage: &Stage) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.ctx.is_surface_configured {
            return Ok(());
        }

        self.renderer.screen().refresh(&self.ctx.queue, &mut self.feed);
        self.renderer.prepare(&self.ctx.queue, stage);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.renderer.encode(&mut encoder, &view);
        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.configure(width, height);
        self.renderer.resize(&self.ctx.device, width, height);
    }

    fn size(&self) -> (u32, u32) {
        (self.ctx.config.width, self.ctx.config.height)
    }
}
