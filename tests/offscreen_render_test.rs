#![cfg(feature = "integration-tests")]

use std::iter;

use instant::Duration;
use retro_pc::{
    assembler::assemble,
    catalog::Variant,
    config::ViewerConfig,
    driver::Stage,
    error::DescriptorProblem,
    media::{MediaStatus, ScreenFeed, ScreenTexture, TextureHandle},
    render::SceneRenderer,
};

use crate::common::test_utils::ScriptedSource;
mod common;

const SIZE: u32 = 256;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

async fn gpu() -> (wgpu::Device, wgpu::Queue) {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .expect("no GPU adapter for offscreen rendering");
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
        })
        .await
        .expect("no GPU device for offscreen rendering")
}

fn stage_for(handle: &TextureHandle) -> Stage {
    let config = ViewerConfig::default();
    Stage {
        composite: assemble(Variant::Classic.parts(), handle).unwrap(),
        camera: config.camera.camera(),
        projection: config.camera.projection(SIZE, SIZE),
    }
}

/// Render one frame into an offscreen texture and read it back.
async fn render_to_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    renderer: &mut SceneRenderer,
    stage: &Stage,
) -> image::RgbaImage {
    let extent = wgpu::Extent3d {
        width: SIZE,
        height: SIZE,
        depth_or_array_layers: 1,
    };
    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Test Output Texture"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    renderer.prepare(queue, stage);
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Test Encoder"),
    });
    renderer.encode(&mut encoder, &view);

    let u32_size = std::mem::size_of::<u32>() as u32;
    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        size: (u32_size * SIZE * SIZE) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        label: None,
        mapped_at_creation: false,
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(u32_size * SIZE),
                rows_per_image: Some(SIZE),
            },
        },
        extent,
    );
    queue.submit(iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).unwrap();
    });
    device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(Duration::from_secs(3)),
        })
        .unwrap();
    rx.receive().await.unwrap().unwrap();
    let data = buffer_slice.get_mapped_range().to_vec();
    image::RgbaImage::from_raw(SIZE, SIZE, data).unwrap()
}

fn assert_pixel_near(pixel: &image::Rgba<u8>, expected: [u8; 4]) {
    let close = pixel
        .0
        .iter()
        .zip(expected)
        .all(|(a, b)| (*a as i16 - b as i16).abs() <= 2);
    assert!(close, "pixel {:?} is not close to {:?}", pixel.0, expected);
}

#[test]
fn should_render_background_and_black_screen() {
    futures::executor::block_on(async {
        let (device, queue) = gpu().await;
        let screen = ScreenTexture::new(&device, &queue, 64, 48);
        let stage = stage_for(screen.handle());
        let config = ViewerConfig::default();
        let mut renderer =
            SceneRenderer::new(&device, &queue, FORMAT, (SIZE, SIZE), &stage, screen, &config)
                .unwrap();

        let img = render_to_image(&device, &queue, &mut renderer, &stage).await;
        // Corners show the clear colour, the centre looks at the unlit screen
        assert_pixel_near(img.get_pixel(0, 0), [0x33, 0x33, 0x33, 255]);
        assert_pixel_near(img.get_pixel(SIZE - 1, 0), [0x33, 0x33, 0x33, 255]);
        assert_pixel_near(img.get_pixel(SIZE / 2, SIZE / 2), [0, 0, 0, 255]);
    });
}

#[test]
fn should_show_video_frames_on_the_screen() {
    futures::executor::block_on(async {
        let (device, queue) = gpu().await;
        let screen = ScreenTexture::new(&device, &queue, 64, 48);
        let stage = stage_for(screen.handle());
        let config = ViewerConfig::default();
        let mut renderer =
            SceneRenderer::new(&device, &queue, FORMAT, (SIZE, SIZE), &stage, screen, &config)
                .unwrap();

        let source = ScriptedSource::new(MediaStatus::Ready);
        source.push_frame(64, 48, [255, 0, 0, 255]);
        let mut feed = ScreenFeed::new(Box::new(source));
        renderer.screen().refresh(&queue, &mut feed);
        assert_eq!(feed.frames_delivered(), 1);

        let img = render_to_image(&device, &queue, &mut renderer, &stage).await;
        assert_pixel_near(img.get_pixel(SIZE / 2, SIZE / 2), [255, 0, 0, 255]);
    });
}

#[test]
fn should_reject_a_screen_bound_to_another_texture() {
    futures::executor::block_on(async {
        let (device, queue) = gpu().await;
        let screen = ScreenTexture::new(&device, &queue, 64, 48);
        let stranger = TextureHandle::new(64, 48);
        let stage = stage_for(&stranger);
        let config = ViewerConfig::default();

        let err = SceneRenderer::new(&device, &queue, FORMAT, (SIZE, SIZE), &stage, screen, &config)
            .unwrap_err();
        assert_eq!(err.part, "display_screen");
        assert!(matches!(err.problem, DescriptorProblem::UnknownTexture { .. }));
    });
}
