//! Manuscript export: the included scenes of a folder joined into one Markdown document.
//!
//! Each scene's `compile_status` decides whether it appears at all, whether its title is written
//! as a heading and whether a `----` break should follow it. A break requested by one scene is
//! carried forward and only written before the next scene that starts without a heading.

use crate::outline::write_title;
use crate::scene_file::SceneFile;
use quire_format::IncludeOptions;

/// Thematic break written between scenes that asked for one.
pub const SCENE_BREAK: &str = "----\n\n";

/// Heading levels at which titles are written when a scene leaves the choice to the export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportDepth {
    #[default]
    All,
    /// Titles at heading level `n` or shallower.
    UpTo(usize),
    None,
}

impl ExportDepth {
    pub fn should_display(&self, depth: usize) -> bool {
        match self {
            ExportDepth::All => true,
            ExportDepth::UpTo(max_depth) => depth <= *max_depth,
            ExportDepth::None => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Heading level of scene titles.
    pub depth: usize,
    /// Applies to scenes whose `include_title` is `Default`.
    pub scene_title_depth: ExportDepth,
    /// Applies to scenes whose `break_at_end` is `Default`.
    pub insert_breaks: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            depth: 1,
            scene_title_depth: ExportDepth::All,
            insert_breaks: false,
        }
    }
}

/// Markdown manuscript of the included `scenes`, in the order given.
pub fn export_text<'a>(
    scenes: impl IntoIterator<Item = &'a SceneFile>,
    options: &ExportOptions,
) -> String {
    let mut export = String::new();
    let mut include_break = false;

    for scene in scenes {
        include_break = export_scene(scene, options, include_break, &mut export);
    }

    export
}

/// Append one scene and return whether the next scene should start with a break.
fn export_scene(
    scene: &SceneFile,
    options: &ExportOptions,
    include_break: bool,
    export: &mut String,
) -> bool {
    let compile_status = scene.document().metadata.compile_status;
    if !compile_status.include() {
        return include_break;
    }

    let display_title = match compile_status.include_title() {
        IncludeOptions::Always => true,
        IncludeOptions::Default => options.scene_title_depth.should_display(options.depth),
        IncludeOptions::Never => false,
    };

    if display_title {
        write_title(scene.title(), options.depth, export);
    } else if include_break {
        export.push_str(SCENE_BREAK);
    }

    export.push_str(&scene.document().body);
    while !export.ends_with("\n\n") {
        export.push('\n');
    }

    match compile_status.break_at_end() {
        IncludeOptions::Always => true,
        IncludeOptions::Default => options.insert_breaks,
        IncludeOptions::Never => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use quire_types::SceneTitle;
    use std::path::PathBuf;

    fn scene(title: &str, body: &str) -> SceneFile {
        let mut scene = SceneFile::create(
            PathBuf::from("/tmp/unused"),
            Some(SceneTitle::new(title).unwrap()),
            Some(0),
            &CoreConfig::default(),
        );
        scene.document_mut().body = body.into();
        scene
    }

    fn untitled(options: ExportOptions) -> ExportOptions {
        ExportOptions {
            scene_title_depth: ExportDepth::None,
            ..options
        }
    }

    #[test]
    fn export_depth_limits_heading_levels() {
        assert!(ExportDepth::All.should_display(9));
        assert!(ExportDepth::UpTo(2).should_display(2));
        assert!(!ExportDepth::UpTo(2).should_display(3));
        assert!(!ExportDepth::None.should_display(1));
    }

    #[test]
    fn default_export_titles_every_included_scene() {
        let first = scene("Arrival", "The platform was empty.");
        let second = scene("Departure", "The train left.\n");

        let text = export_text([&first, &second], &ExportOptions::default());

        assert_eq!(
            text,
            "# Arrival\n\nThe platform was empty.\n\n# Departure\n\nThe train left.\n\n"
        );
    }

    #[test]
    fn excluded_scenes_are_skipped_and_pass_their_break_on() {
        let mut first = scene("One", "first");
        first
            .document_mut()
            .metadata
            .compile_status
            .set_break_at_end(IncludeOptions::Always);
        let mut skipped = scene("Two", "never shown");
        skipped.document_mut().metadata.compile_status.set_include(false);
        let third = scene("Three", "third");

        let text = export_text([&first, &skipped, &third], &untitled(ExportOptions::default()));

        assert_eq!(text, "first\n\n----\n\nthird\n\n");
    }

    #[test]
    fn include_title_overrides_the_export_depth() {
        let mut always = scene("Always", "a");
        always
            .document_mut()
            .metadata
            .compile_status
            .set_include_title(IncludeOptions::Always);
        let mut never = scene("Never", "n");
        never
            .document_mut()
            .metadata
            .compile_status
            .set_include_title(IncludeOptions::Never);
        let default = scene("Default", "d");

        let untitled_text = export_text([&always, &never, &default], &untitled(Default::default()));
        assert_eq!(untitled_text, "# Always\n\na\n\nn\n\nd\n\n");

        let options = ExportOptions {
            depth: 2,
            scene_title_depth: ExportDepth::UpTo(2),
            ..Default::default()
        };
        let titled_text = export_text([&always, &never, &default], &options);
        assert_eq!(titled_text, "## Always\n\na\n\nn\n\n## Default\n\nd\n\n");

        let shallow = ExportOptions {
            depth: 3,
            ..options
        };
        let shallow_text = export_text([&default], &shallow);
        assert_eq!(shallow_text, "d\n\n");
    }

    #[test]
    fn break_at_end_overrides_insert_breaks() {
        let mut always = scene("Always", "a");
        always
            .document_mut()
            .metadata
            .compile_status
            .set_break_at_end(IncludeOptions::Always);
        let mut never = scene("Never", "n");
        never
            .document_mut()
            .metadata
            .compile_status
            .set_break_at_end(IncludeOptions::Never);
        let default = scene("Default", "d");
        let last = scene("Last", "z");

        let options = untitled(ExportOptions::default());
        let text = export_text([&always, &never, &default, &last], &options);
        assert_eq!(text, "a\n\n----\n\nn\n\nd\n\nz\n\n");

        let with_breaks = ExportOptions {
            insert_breaks: true,
            ..options
        };
        let text = export_text([&always, &never, &default, &last], &with_breaks);
        assert_eq!(text, "a\n\n----\n\nn\n\nd\n\n----\n\nz\n\n");
    }

    #[test]
    fn a_heading_replaces_a_requested_break() {
        let mut first = scene("One", "first");
        first
            .document_mut()
            .metadata
            .compile_status
            .set_break_at_end(IncludeOptions::Always);
        let second = scene("Two", "second");

        let text = export_text([&first, &second], &ExportOptions::default());

        assert_eq!(text, "# One\n\nfirst\n\n# Two\n\nsecond\n\n");
    }

    #[test]
    fn export_of_nothing_is_empty() {
        let text = export_text(std::iter::empty::<&SceneFile>(), &ExportOptions::default());
        assert_eq!(text, "");
    }
}
