//! Viewer configuration.
//!
//! Everything has a default matching the published scene. Overrides come as
//! `key=value` pairs, either from a URL query on the web
//! (`?variant=compact&video=...`) or from `RETRO_PC_*` environment variables
//! natively (`RETRO_PC_VARIANT=compact`).
//!
//! Recognised keys: `variant`, `video`, `poster`, `background`, `screen`,
//! `amplitude`, `omega`.

use anyhow::Context as _;
use cgmath::Deg;

use crate::{
    camera::{Camera, Projection},
    catalog::{Rgb, Variant},
    driver::Oscillation,
    pipelines::light::Lighting,
};

pub const ENV_PREFIX: &str = "RETRO_PC_";

/// Where the camera sits and what it sees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl CameraSettings {
    pub fn camera(&self) -> Camera {
        Camera::looking_at(self.eye, self.target)
    }

    pub fn projection(&self, width: u32, height: u32) -> Projection {
        Projection::new(width, height, self.fovy, self.znear, self.zfar)
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 8.0],
            target: [0.0, 0.0, 0.0],
            fovy: Deg(75.0),
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub variant: Variant,
    /// Replaces the variant's own video URL when set.
    pub video_url: Option<String>,
    /// Image under `./assets/` shown on the screen by native builds.
    pub poster: String,
    pub clear_colour: Rgb,
    /// Size of the screen texture every frame is scaled to.
    pub screen_resolution: (u32, u32),
    pub oscillation: Oscillation,
    pub lighting: Lighting,
    pub camera: CameraSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            video_url: None,
            poster: "screen.png".to_string(),
            clear_colour: Rgb(0x333333),
            screen_resolution: (680, 480),
            oscillation: Oscillation::default(),
            lighting: Lighting::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl ViewerConfig {
    pub fn video_url(&self) -> &str {
        self.video_url
            .as_deref()
            .unwrap_or_else(|| self.variant.video_url())
    }

    /// Defaults overridden by `pairs`. Unknown keys are logged and skipped,
    /// values that do not parse are an error.
    pub fn from_pairs<I, K, V>(pairs: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            config.set(key.as_ref(), value.as_ref())?;
        }
        Ok(config)
    }

    /// Parse a URL query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> anyhow::Result<Self> {
        let pairs = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (percent_decode(key), percent_decode(value))
            })
            .collect::<Vec<_>>();
        Self::from_pairs(pairs)
    }

    /// Read every `RETRO_PC_*` variable, e.g. `RETRO_PC_VIDEO`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_pairs(std::env::vars().filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|key| (key.to_ascii_lowercase(), value))
        }))
    }

    /// Reject settings the device cannot honour. The screen texture must fit
    /// into `limits.max_texture_dimension_2d` on both axes.
    pub fn check_limits(&self, limits: &wgpu::Limits) -> anyhow::Result<()> {
        let (width, height) = self.screen_resolution;
        let max = limits.max_texture_dimension_2d;
        anyhow::ensure!(
            width <= max && height <= max,
            "screen resolution {}x{} exceeds the device limit of {}",
            width,
            height,
            max
        );
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        match key.trim() {
            "variant" => self.variant = value.parse()?,
            "video" => {
                self.video_url = Some(value.to_string()).filter(|url| !url.is_empty());
            }
            "poster" => self.poster = value.to_string(),
            "background" => self.clear_colour = parse_rgb(value)?,
            "screen" => self.screen_resolution = parse_resolution(value)?,
            "amplitude" => {
                let amplitude: f32 = value
                    .parse()
                    .with_context(|| format!("amplitude '{}' is not a number", value))?;
                anyhow::ensure!(
                    amplitude.is_finite() && amplitude >= 0.0,
                    "amplitude must be finite and not negative, got {}",
                    amplitude
                );
                self.oscillation.amplitude = amplitude;
            }
            "omega" => {
                let omega: f32 = value
                    .parse()
                    .with_context(|| format!("omega '{}' is not a number", value))?;
                anyhow::ensure!(
                    omega.is_finite() && omega > 0.0,
                    "omega must be finite and positive, got {}",
                    omega
                );
                self.oscillation.omega = omega;
            }
            other => log::warn!("ignoring unknown setting '{}'", other),
        }
        Ok(())
    }
}

fn parse_rgb(value: &str) -> anyhow::Result<Rgb> {
    let hex = value
        .trim_start_matches('#')
        .trim_start_matches("0x");
    anyhow::ensure!(hex.len() == 6, "colour '{}' must have six hex digits", value);
    let rgb = u32::from_str_radix(hex, 16)
        .with_context(|| format!("colour '{}' is not hexadecimal", value))?;
    Ok(Rgb(rgb))
}

fn parse_resolution(value: &str) -> anyhow::Result<(u32, u32)> {
    let (width, height) = value
        .split_once('x')
        .with_context(|| format!("resolution '{}' must look like 640x480", value))?;
    let width: u32 = width.trim().parse()?;
    let height: u32 = height.trim().parse()?;
    anyhow::ensure!(
        width > 0 && height > 0,
        "resolution '{}' must not be empty",
        value
    );
    Ok((width, height))
}

/// `+` and `%XX` decoding for query components. Malformed escapes are kept
/// as they are.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push(hex_value(bytes[i + 1]) << 4 | hex_value(bytes[i + 2]));
                i += 2;
            }
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}
