//! Scene file format version 1.
//!
//! Version 1 is the layout written by every release so far: TOML key/value pairs, a line of eight
//! `+` characters, one blank line and then the Markdown body.

pub mod constants;
mod header;
pub mod scene;
