//! Constants for format version 1.

/// Line separating the metadata header from the Markdown body.
pub const HEADER_SPLIT: &str = "++++++++";

/// Format version written into new files.
pub const DEFAULT_FILE_FORMAT_VERSION: u64 = 1;

/// `file_type` value identifying a scene.
pub const SCENE_FILE_TYPE: &str = "scene";

pub const FILE_FORMAT_VERSION_KEY: &str = "file_format_version";
pub const NAME_KEY: &str = "name";
pub const ID_KEY: &str = "id";
pub const FILE_TYPE_KEY: &str = "file_type";
pub const SUMMARY_KEY: &str = "summary";
pub const NOTES_KEY: &str = "notes";
pub const POV_KEY: &str = "pov";
pub const COMPILE_STATUS_KEY: &str = "compile_status";

/// Every header key with a typed field, in the order they are written.
pub const RECOGNIZED_KEYS: &[&str] = &[
    FILE_FORMAT_VERSION_KEY,
    NAME_KEY,
    ID_KEY,
    FILE_TYPE_KEY,
    SUMMARY_KEY,
    NOTES_KEY,
    POV_KEY,
    COMPILE_STATUS_KEY,
];
