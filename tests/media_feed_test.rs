use std::io::Cursor;

use retro_pc::{
    error::AssetLoadFailure,
    media::{MediaSource, MediaStatus, ScreenFeed, StillImageSource, TextureHandle, Unavailable},
};

use crate::common::test_utils::ScriptedSource;
mod common;

fn network_error() -> AssetLoadFailure {
    AssetLoadFailure::Fetch {
        url: "https://example.org/missing.mp4".to_string(),
        reason: "404".to_string(),
    }
}

#[test]
fn loading_source_yields_nothing_yet() {
    let source = ScriptedSource::new(MediaStatus::Loading);
    source.push_frame(64, 48, [255, 0, 0, 255]);
    let mut feed = ScreenFeed::new(Box::new(source.clone()));

    assert!(feed.poll(64, 48).is_none());
    assert_eq!(feed.frames_delivered(), 0);

    source.set_status(MediaStatus::Ready);
    let frame = feed.poll(64, 48).unwrap();
    assert_eq!(frame.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(feed.frames_delivered(), 1);
}

#[test]
fn failure_is_reported_once_and_never_panics() {
    let source = ScriptedSource::new(MediaStatus::Failed(network_error()));
    let mut feed = ScreenFeed::new(Box::new(source));

    assert!(!feed.failure_reported());
    for _ in 0..100 {
        assert!(feed.poll(64, 48).is_none());
    }
    assert!(feed.failure_reported());
    assert_eq!(feed.status(), MediaStatus::Failed(network_error()));
}

#[test]
fn failing_after_playback_keeps_the_last_frame_delivered() {
    let source = ScriptedSource::new(MediaStatus::Ready);
    source.push_frame(64, 48, [0, 255, 0, 255]);
    source.push_frame(64, 48, [0, 0, 255, 255]);
    let mut feed = ScreenFeed::new(Box::new(source.clone()));

    assert!(feed.poll(64, 48).is_some());
    source.set_status(MediaStatus::Failed(AssetLoadFailure::Playback {
        url: "domaevideo.mp4".to_string(),
        reason: "NotAllowedError".to_string(),
    }));
    assert!(feed.poll(64, 48).is_none());
    assert_eq!(feed.frames_delivered(), 1);
}

#[test]
fn frames_of_the_wrong_size_are_dropped() {
    let source = ScriptedSource::new(MediaStatus::Ready);
    source.push_frame(32, 32, [255; 4]);
    let mut feed = ScreenFeed::new(Box::new(source));
    assert!(feed.poll(64, 48).is_none());
    assert_eq!(feed.frames_delivered(), 0);
}

#[test]
fn unavailable_source_reports_its_failure() {
    let mut source = Unavailable(network_error());
    assert_eq!(source.status(), MediaStatus::Failed(network_error()));
    assert!(source.next_frame(64, 48).is_none());
}

#[test]
fn still_image_is_scaled_and_served_once_per_size() {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        8,
        8,
        image::Rgba([10, 20, 30, 255]),
    ))
    .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
    .unwrap();

    let mut source = StillImageSource::from_bytes("card.png", &bytes).unwrap();
    assert_eq!(source.name(), "card.png");
    assert_eq!(source.status(), MediaStatus::Ready);

    let frame = source.next_frame(16, 12).unwrap();
    assert_eq!(frame.dimensions(), (16, 12));
    assert_eq!(frame.get_pixel(5, 5).0, [10, 20, 30, 255]);
    assert!(source.next_frame(16, 12).is_none());
    assert!(source.next_frame(4, 4).is_some());
}

#[test]
fn garbage_bytes_are_a_decode_failure() {
    let err = StillImageSource::from_bytes("noise.png", b"definitely not a png")
        .err()
        .unwrap();
    assert!(matches!(err, AssetLoadFailure::Decode { .. }));
    assert_eq!(err.url(), "noise.png");
}

#[test]
fn texture_handles_are_unique() {
    let a = TextureHandle::new(64, 48);
    let b = TextureHandle::new(64, 48);
    assert_ne!(a, b);
    assert_ne!(a.id(), b.id());
    assert_eq!(a.size(), (64, 48));
}

#[test]
fn loaded_data_only_readies_a_loading_source() {
    let mut status = MediaStatus::Loading;
    assert!(status.mark_loaded());
    assert_eq!(status, MediaStatus::Ready);
    assert!(!status.mark_loaded());

    let mut failed = MediaStatus::Failed(network_error());
    assert!(!failed.mark_loaded());
    assert_eq!(failed, MediaStatus::Failed(network_error()));
}
