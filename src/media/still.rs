use image::{DynamicImage, imageops::FilterType};

use crate::{
    error::AssetLoadFailure,
    media::{MediaSource, MediaStatus},
};

/// A single decoded image served as a one-frame "video".
pub struct StillImageSource {
    name: String,
    image: DynamicImage,
    delivered: Option<(u32, u32)>,
}

impl StillImageSource {
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn load(file_name: &str) -> Result<Self, AssetLoadFailure> {
        let bytes = crate::resources::load_binary(file_name)
            .await
            .map_err(|e| AssetLoadFailure::Fetch {
                url: file_name.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_bytes(file_name, &bytes)
    }

    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self, AssetLoadFailure> {
        let image = image::load_from_memory(bytes).map_err(|e| AssetLoadFailure::Decode {
            url: name.to_string(),
            reason: e.to_string(),
        })?;
        log::debug!(
            "decoded still frame {} ({}x{})",
            name,
            image.width(),
            image.height()
        );
        Ok(Self {
            name: name.to_string(),
            image,
            delivered: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl MediaSource for StillImageSource {
    fn status(&self) -> MediaStatus {
        MediaStatus::Ready
    }

    fn next_frame(&mut self, width: u32, height: u32) -> Option<image::RgbaImage> {
        // The image never changes, so it only has to be handed out once per size
        if self.delivered == Some((width, height)) {
            return None;
        }
        self.delivered = Some((width, height));
        Some(
            self.image
                .resize_exact(width, height, FilterType::Triangle)
                .to_rgba8(),
        )
    }
}
