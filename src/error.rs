//! The two failure kinds the viewer distinguishes.
//!
//! [`MalformedDescriptor`] is fatal: it stops assembly and with it startup.
//! [`AssetLoadFailure`] only degrades the screen texture; it is reported once
//! and the render loop keeps going.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum DescriptorProblem {
    EmptyCatalog,
    NonPositiveDimension { index: usize, value: f32 },
    NonFiniteOffset,
    DuplicateName,
    NoDisplaySurface,
    SecondDisplaySurface { first: String },
    UnknownTexture { expected: u32, found: u32 },
}

/// A part table that cannot be turned into a composite.
#[derive(Clone, Debug, PartialEq)]
pub struct MalformedDescriptor {
    /// Name of the offending part, empty for catalog-wide problems.
    pub part: String,
    pub problem: DescriptorProblem,
}

impl MalformedDescriptor {
    pub fn new(part: impl Into<String>, problem: DescriptorProblem) -> Self {
        Self {
            part: part.into(),
            problem,
        }
    }
}

impl fmt::Display for MalformedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            DescriptorProblem::EmptyCatalog => write!(f, "catalog contains no parts"),
            DescriptorProblem::NonPositiveDimension { index, value } => write!(
                f,
                "part '{}' has dimension #{} = {}, dimensions must be finite and positive",
                self.part, index, value
            ),
            DescriptorProblem::NonFiniteOffset => {
                write!(f, "part '{}' has a non-finite offset", self.part)
            }
            DescriptorProblem::DuplicateName => {
                write!(f, "part name '{}' is used more than once", self.part)
            }
            DescriptorProblem::NoDisplaySurface => {
                write!(f, "catalog designates no display surface")
            }
            DescriptorProblem::SecondDisplaySurface { first } => write!(
                f,
                "part '{}' is a second display surface, '{}' already is one",
                self.part, first
            ),
            DescriptorProblem::UnknownTexture { expected, found } => write!(
                f,
                "part '{}' is bound to texture #{}, but the screen texture is #{}",
                self.part, found, expected
            ),
        }
    }
}

impl std::error::Error for MalformedDescriptor {}

/// The screen media could not be fetched, decoded or played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetLoadFailure {
    Fetch { url: String, reason: String },
    Decode { url: String, reason: String },
    Playback { url: String, reason: String },
}

impl AssetLoadFailure {
    pub fn url(&self) -> &str {
        match self {
            AssetLoadFailure::Fetch { url, .. }
            | AssetLoadFailure::Decode { url, .. }
            | AssetLoadFailure::Playback { url, .. } => url,
        }
    }
}

impl fmt::Display for AssetLoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLoadFailure::Fetch { url, reason } => {
                write!(f, "could not load media {}: {}", url, reason)
            }
            AssetLoadFailure::Decode { url, reason } => {
                write!(f, "could not decode media {}: {}", url, reason)
            }
            AssetLoadFailure::Playback { url, reason } => {
                write!(f, "could not play media {}: {}", url, reason)
            }
        }
    }
}

impl std::error::Error for AssetLoadFailure {}
