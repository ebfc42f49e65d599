//! Plain-text reports over scenes: outlines and word counts.

use crate::scene_file::SceneFile;

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Markdown outline of `scenes`: a heading per scene followed by its summary, point of view and
/// notes. Empty properties are left out.
///
/// `depth` is the heading level used for scene titles.
pub fn write_outline<'a>(scenes: impl IntoIterator<Item = &'a SceneFile>, depth: usize) -> String {
    let mut outline = String::new();

    for scene in scenes {
        write_title(scene.title(), depth, &mut outline);

        let metadata = &scene.document().metadata;
        write_outline_property("summary", &metadata.summary, &mut outline);
        if let Some(pov) = metadata.pov.name().filter(|name| !name.is_empty()) {
            write_outline_property("pov", pov, &mut outline);
        }
        write_outline_property("notes", &metadata.notes, &mut outline);
    }

    outline
}

pub(crate) fn write_title(title: &str, depth: usize, outline: &mut String) {
    outline.push_str(&"#".repeat(depth.max(1)));
    outline.push(' ');
    outline.push_str(title);
    outline.push_str("\n\n");
}

fn write_outline_property(property_name: &str, value: &str, outline: &mut String) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    outline.push_str(property_name);
    outline.push_str(":\n\n");
    outline.push_str(value);
    outline.push_str("\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use quire_format::PovReference;
    use quire_types::SceneTitle;
    use std::path::PathBuf;

    fn scene(title: Option<&str>) -> SceneFile {
        SceneFile::create(
            PathBuf::from("/tmp/unused"),
            title.map(|t| SceneTitle::new(t).unwrap()),
            Some(0),
            &CoreConfig::default(),
        )
    }

    #[test]
    fn counts_words_across_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("  The fog\ncame   in.\r\n"), 4);
    }

    #[test]
    fn outline_lists_properties_that_are_set() {
        let mut first = scene(Some("Arrival"));
        {
            let metadata = &mut first.document_mut().metadata;
            metadata.summary = "Jun gets off the train.".into();
            metadata.pov = PovReference::new("Jun", "77");
        }
        let mut second = scene(None);
        second.document_mut().metadata.notes = "  needs a rewrite \n".into();

        let outline = write_outline([&first, &second], 2);

        assert_eq!(
            outline,
            concat!(
                "## Arrival\n\n",
                "summary:\n\nJun gets off the train.\n\n",
                "pov:\n\nJun\n\n",
                "## New Scene\n\n",
                "notes:\n\nneeds a rewrite\n\n",
            )
        );
    }

    #[test]
    fn outline_of_nothing_is_empty() {
        assert_eq!(write_outline(std::iter::empty::<&SceneFile>(), 1), "");
    }
}
