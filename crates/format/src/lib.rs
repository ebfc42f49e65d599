//! Scene file format support.
//!
//! This crate is responsible for translating between on-disk scene files (a TOML metadata header
//! followed by a Markdown body) and the in-memory [`SceneDocument`].
//!
//! It performs no I/O. Reading, writing and naming files on disk lives in `quire-core`; this crate
//! handles the text format, its defaults, and round-trip stability only.

pub mod compile_status;
pub mod reference;
pub mod v1;

pub use compile_status::{CompileStatus, IncludeOptions};
pub use reference::{NamedPov, PovReference};
pub use v1::constants::{HEADER_SPLIT, RECOGNIZED_KEYS};
pub use v1::scene::{default_metadata, SceneDocument, SceneMetadata};

use thiserror::Error;

/// Errors returned by the `quire-format` crate.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("malformed scene header: {0}")]
    MalformedHeader(#[from] MalformedHeaderError),

    #[error("{key} value {value} cannot be represented in the header")]
    ValueOutOfRange { key: &'static str, value: u64 },
}

/// The header region of a scene file exists but could not be decoded.
///
/// Returned instead of a partially populated document, so callers can surface the problem rather
/// than silently dropping metadata.
#[derive(Debug, Error)]
pub enum MalformedHeaderError {
    #[error("invalid TOML: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("`{key}` must be {expected}, found {found}")]
    InvalidField {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{key}` must not be negative, found {value}")]
    NegativeInteger { key: &'static str, value: i64 },
}

/// Read a scene document from file contents.
pub fn read_scene_markdown(input: &str) -> Result<SceneDocument, FormatError> {
    v1::scene::read_markdown(input)
}

/// Write a scene document to file contents.
pub fn write_scene_markdown(document: &SceneDocument) -> Result<String, FormatError> {
    v1::scene::write_markdown(document)
}
