//! # Quire Core
//!
//! Scene files on disk for the quire writing tools.
//!
//! This crate contains file and folder management built on the `quire-format` codec:
//! - Loading scenes, including files created outside the editor
//! - Atomic saves and renames that keep filenames in step with scene names and positions
//! - Folder scans, outlines and word counts
//! - Manuscript export driven by each scene's compile flags
//!
//! **No format concerns**: parsing and writing the scene text format belongs in `quire-format`.

pub mod config;
pub mod constants;
pub mod export;
pub mod naming;
pub mod outline;
pub mod scan;
pub mod scene_file;

mod error;

pub use config::CoreConfig;
pub use error::{QuireError, QuireResult};
pub use export::{export_text, ExportDepth, ExportOptions};
pub use outline::{word_count, write_outline};
pub use scan::{renumber, save_all, scan_scenes, ScanResult};
pub use scene_file::SceneFile;

pub use quire_format::{
    CompileStatus, FormatError, IncludeOptions, MalformedHeaderError, NamedPov, PovReference,
    SceneDocument, SceneMetadata,
};
pub use quire_types::{SceneTitle, TextError};
