//! Constants used throughout the quire core crate.
//!
//! This module contains filename and path constants to ensure consistency across the codebase.

/// Extension of scene files (without the dot).
pub const SCENE_EXTENSION: &str = "md";

/// Default maximum length, in bytes, of the name part of a scene filename.
pub const DEFAULT_FILENAME_MAX_LENGTH: usize = 30;

/// Display name for scenes whose name is empty; also used for their filenames.
pub const EMPTY_SCENE_NAME: &str = "New Scene";

/// Default project directory when no explicit directory is configured.
pub const DEFAULT_PROJECT_DIR: &str = ".";

/// Suffix of the temporary file written next to a scene while saving it.
pub const TEMP_FILE_SUFFIX: &str = ".tmp";

/// Suffix of the hidden name a scene file is parked under while a folder is being renumbered.
pub const RENAME_STAGING_SUFFIX: &str = ".moving";
