//! Static part tables for every model variant.
//!
//! A catalog is nothing but data: an ordered slice of [`PartDescriptor`]s per
//! [`Variant`]. The assembler turns it into a [`crate::data_structures::scene_graph::CompositeObject`],
//! so adding a variant never requires new scene code, only a new table.

use std::{fmt, str::FromStr};

/// A 24-bit sRGB colour as written in hex (`0xe0dfd5`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xffffff);

    pub fn channels(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Channels in `0.0..=1.0`, still sRGB encoded.
    pub fn to_srgb(self) -> [f32; 3] {
        self.channels().map(|c| c as f32 / 255.0)
    }

    /// Channels converted to linear light, which is what the shader works in.
    pub fn to_linear(self) -> [f32; 3] {
        self.to_srgb().map(srgb_to_linear)
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b] = self.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Primitive geometry of a part, dimensions in scene units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box { width: f32, height: f32, depth: f32 },
    Plane { width: f32, height: f32 },
}

impl Shape {
    pub fn dimensions(&self) -> Vec<f32> {
        match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => vec![width, height, depth],
            Shape::Plane { width, height } => vec![width, height],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Box { .. } => "box",
            Shape::Plane { .. } => "plane",
        }
    }
}

/// Placement of a part relative to the composite's origin.
///
/// `rotation` holds Euler angles in radians, in intrinsic XYZ order
/// (matrix `Rx * Ry * Rz`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalOffset {
    pub translation: [f32; 3],
    pub rotation: [f32; 3],
}

impl LocalOffset {
    pub const ORIGIN: LocalOffset = LocalOffset {
        translation: [0.0; 3],
        rotation: [0.0; 3],
    };

    pub const fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: [x, y, z],
            rotation: [0.0; 3],
        }
    }

    pub const fn tilted_x(self, radians: f32) -> Self {
        Self {
            translation: self.translation,
            rotation: [radians, self.rotation[1], self.rotation[2]],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.translation
            .iter()
            .chain(self.rotation.iter())
            .all(|v| v.is_finite())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartRole {
    /// Lit with the part colour.
    Solid,
    /// Unlit, sampled from the screen texture.
    DisplaySurface,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartDescriptor {
    pub name: &'static str,
    pub shape: Shape,
    pub color: Rgb,
    pub offset: LocalOffset,
    pub role: PartRole,
}

impl PartDescriptor {
    const fn solid(name: &'static str, shape: Shape, color: Rgb, offset: LocalOffset) -> Self {
        Self {
            name,
            shape,
            color,
            offset,
            role: PartRole::Solid,
        }
    }

    const fn display(name: &'static str, shape: Shape, offset: LocalOffset) -> Self {
        Self {
            name,
            shape,
            color: Rgb::WHITE,
            offset,
            role: PartRole::DisplaySurface,
        }
    }

    pub fn is_display_surface(&self) -> bool {
        self.role == PartRole::DisplaySurface
    }
}

/// The three colours every variant paints its case with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub case: Rgb,
    pub dark: Rgb,
    pub screen_border: Rgb,
}

/// Which retro PC to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The published model, streaming its video from the project site.
    #[default]
    Classic,
    /// A smaller case in a warmer beige that plays the video from the
    /// serving origin.
    Compact,
}

const CLASSIC_PALETTE: Palette = Palette {
    case: Rgb(0xe0dfd5),
    dark: Rgb(0x404040),
    screen_border: Rgb(0x2f2f2f),
};

const COMPACT_PALETTE: Palette = Palette {
    case: Rgb(0xd8cfb8),
    dark: Rgb(0x4a4a4a),
    screen_border: Rgb(0x1e1e1e),
};

const fn cuboid(width: f32, height: f32, depth: f32) -> Shape {
    Shape::Box {
        width,
        height,
        depth,
    }
}

const CLASSIC_PARTS: [PartDescriptor; 8] = [
    PartDescriptor::solid(
        "monitor_body",
        cuboid(4.2, 3.2, 1.8),
        CLASSIC_PALETTE.case,
        LocalOffset::ORIGIN,
    ),
    PartDescriptor::solid(
        "bezel",
        cuboid(3.8, 2.8, 0.2),
        CLASSIC_PALETTE.screen_border,
        LocalOffset::at(0.0, 0.0, 0.8),
    ),
    PartDescriptor::display(
        "display_screen",
        Shape::Plane {
            width: 3.4,
            height: 2.4,
        },
        LocalOffset::at(0.0, 0.0, 0.91),
    ),
    PartDescriptor::solid(
        "top_ridge",
        cuboid(4.0, 0.1, 1.5),
        CLASSIC_PALETTE.dark,
        LocalOffset::at(0.0, 1.5, 0.0),
    ),
    PartDescriptor::solid(
        "stand",
        cuboid(1.2, 1.2, 1.2),
        CLASSIC_PALETTE.case,
        LocalOffset::at(0.0, -2.0, 0.0),
    ),
    PartDescriptor::solid(
        "stand_base",
        cuboid(2.5, 0.3, 1.5),
        CLASSIC_PALETTE.case,
        LocalOffset::at(0.0, -2.75, 0.0),
    ),
    PartDescriptor::solid(
        "keyboard",
        cuboid(3.5, 0.4, 1.2),
        CLASSIC_PALETTE.dark,
        LocalOffset::at(0.0, -2.9, 2.0).tilted_x(-0.1),
    ),
    PartDescriptor::solid(
        "keyboard_detail",
        cuboid(3.3, 0.1, 1.0),
        CLASSIC_PALETTE.dark,
        LocalOffset::at(0.0, -2.7, 2.0).tilted_x(-0.1),
    ),
];

const COMPACT_PARTS: [PartDescriptor; 8] = [
    PartDescriptor::solid(
        "monitor_body",
        cuboid(3.6, 2.8, 1.6),
        COMPACT_PALETTE.case,
        LocalOffset::ORIGIN,
    ),
    PartDescriptor::solid(
        "bezel",
        cuboid(3.2, 2.4, 0.2),
        COMPACT_PALETTE.screen_border,
        LocalOffset::at(0.0, 0.0, 0.7),
    ),
    PartDescriptor::display(
        "display_screen",
        Shape::Plane {
            width: 2.8,
            height: 2.0,
        },
        LocalOffset::at(0.0, 0.0, 0.81),
    ),
    PartDescriptor::solid(
        "top_ridge",
        cuboid(3.4, 0.1, 1.3),
        COMPACT_PALETTE.dark,
        LocalOffset::at(0.0, 1.3, 0.0),
    ),
    PartDescriptor::solid(
        "stand",
        cuboid(1.0, 1.0, 1.0),
        COMPACT_PALETTE.case,
        LocalOffset::at(0.0, -1.8, 0.0),
    ),
    PartDescriptor::solid(
        "stand_base",
        cuboid(2.2, 0.3, 1.3),
        COMPACT_PALETTE.case,
        LocalOffset::at(0.0, -2.45, 0.0),
    ),
    PartDescriptor::solid(
        "keyboard",
        cuboid(3.2, 0.35, 1.1),
        COMPACT_PALETTE.dark,
        LocalOffset::at(0.0, -2.6, 1.8).tilted_x(-0.1),
    ),
    PartDescriptor::solid(
        "keyboard_detail",
        cuboid(3.0, 0.1, 0.9),
        COMPACT_PALETTE.dark,
        LocalOffset::at(0.0, -2.42, 1.8).tilted_x(-0.1),
    ),
];

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Classic, Variant::Compact];

    /// Ordered part table. The order is the order children are attached in.
    pub fn parts(self) -> &'static [PartDescriptor] {
        match self {
            Variant::Classic => &CLASSIC_PARTS,
            Variant::Compact => &COMPACT_PARTS,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Variant::Classic => CLASSIC_PALETTE,
            Variant::Compact => COMPACT_PALETTE,
        }
    }

    pub fn video_url(self) -> &'static str {
        match self {
            Variant::Classic => {
                "https://domae-space.github.io/3d-viewer-project/public/video/domaevideo.mp4"
            }
            Variant::Compact => "public/video/domaevideo.mp4",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Compact => "compact",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown model variant '{}', expected one of: classic, compact",
                    s
                )
            })
    }
}
