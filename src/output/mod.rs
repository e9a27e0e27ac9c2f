//! Output profiles and artifact destinations.
//!
//! Every frame is written once per profile. A profile names its artifacts
//! and selects the transform applied on write; a sink decides where the
//! artifact bytes go.

mod profile;
mod sink;

pub use profile::{profiles_from_tokens, OutputProfile, ProfileError, Transform, ARTIFACT_EXTENSION};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};
