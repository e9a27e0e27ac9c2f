//! Named output variants and their transforms.

use std::str::FromStr;
use thiserror::Error;

/// File extension of every artifact.
pub const ARTIFACT_EXTENSION: &str = "pgm";

/// Errors in an output profile definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("unknown frame operation {0:?} (expected none, invert, reverse or revinvert)")]
    UnknownTransform(String),
}

/// Transform applied when a frame is written under a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Transform {
    /// Write `255 - b` for every sample `b`.
    pub invert: bool,
    /// Name artifacts counting down from the frame ceiling.
    pub reverse_order: bool,
}

impl Transform {
    /// No transform.
    pub const NONE: Self = Self {
        invert: false,
        reverse_order: false,
    };
    /// Inverted samples.
    pub const INVERT: Self = Self {
        invert: true,
        reverse_order: false,
    };
    /// Reversed naming.
    pub const REVERSE: Self = Self {
        invert: false,
        reverse_order: true,
    };
    /// Inverted samples and reversed naming.
    pub const REVERSE_INVERT: Self = Self {
        invert: true,
        reverse_order: true,
    };

    /// Configuration token for this transform.
    pub fn token(&self) -> &'static str {
        match (self.invert, self.reverse_order) {
            (false, false) => "none",
            (true, false) => "invert",
            (false, true) => "reverse",
            (true, true) => "revinvert",
        }
    }
}

impl FromStr for Transform {
    type Err = ProfileError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "none" => Ok(Self::NONE),
            "invert" => Ok(Self::INVERT),
            "reverse" => Ok(Self::REVERSE),
            "revinvert" => Ok(Self::REVERSE_INVERT),
            other => Err(ProfileError::UnknownTransform(other.to_string())),
        }
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// A named output variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputProfile {
    name: String,
    transform: Transform,
}

impl OutputProfile {
    /// Creates a profile.
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
        }
    }

    /// Creates a profile from a transform token such as `"revinvert"`.
    pub fn from_token(name: impl Into<String>, token: &str) -> Result<Self, ProfileError> {
        Ok(Self::new(name, token.parse()?))
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Index used in the artifact name for `frame_index`.
    ///
    /// Reversed profiles count down from `max_frames`, so frames can be
    /// assembled back to front without renumbering. Indices past the
    /// ceiling go negative.
    pub fn artifact_index(&self, frame_index: u64, max_frames: u64) -> i64 {
        let index = frame_index as i64;
        if self.transform.reverse_order {
            max_frames as i64 - index
        } else {
            index
        }
    }

    /// Artifact name `<name>-<NNNNN>.pgm` for `frame_index`.
    pub fn artifact_name(&self, frame_index: u64, max_frames: u64) -> String {
        format!(
            "{}-{:05}.{}",
            self.name,
            self.artifact_index(frame_index, max_frames),
            ARTIFACT_EXTENSION
        )
    }
}

/// Builds profiles from `(transform token, name)` pairs.
///
/// A pair with an unknown token is reported and dropped; the rest are kept
/// in order.
pub fn profiles_from_tokens<I, T, N>(pairs: I) -> Vec<OutputProfile>
where
    I: IntoIterator<Item = (T, N)>,
    T: AsRef<str>,
    N: Into<String>,
{
    pairs
        .into_iter()
        .filter_map(|(token, name)| {
            let name = name.into();
            match OutputProfile::from_token(name.clone(), token.as_ref()) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!(profile = %name, error = %e, "Skipping output profile");
                    None
                }
            }
        })
        .collect()
}
