//! Human and machine readable summaries of a scene for `quire show`.

use quire_core::{IncludeOptions, PovReference, SceneFile};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct SceneReport<'a> {
    pub path: String,
    pub name: &'a str,
    pub id: &'a str,
    pub file_format_version: u64,
    pub summary: &'a str,
    pub notes: &'a str,
    pub pov: &'a PovReference,
    pub include: bool,
    pub include_title: &'static str,
    pub break_at_end: &'static str,
    pub words: usize,
    /// Header keys quire does not recognise, kept as-is on save.
    pub extra_keys: Vec<&'a str>,
    /// Fixups were applied while loading that have not been written back yet.
    pub unsaved_changes: bool,
}

impl<'a> SceneReport<'a> {
    pub fn new(scene: &'a SceneFile) -> Self {
        let metadata = &scene.document().metadata;
        Self {
            path: scene.path().display().to_string(),
            name: scene.title(),
            id: scene.id(),
            file_format_version: metadata.file_format_version,
            summary: &metadata.summary,
            notes: &metadata.notes,
            pov: &metadata.pov,
            include: metadata.compile_status.include(),
            include_title: include_options_label(metadata.compile_status.include_title()),
            break_at_end: include_options_label(metadata.compile_status.break_at_end()),
            words: scene.word_count(),
            extra_keys: metadata.extra.keys().map(String::as_str).collect(),
            unsaved_changes: scene.is_modified(),
        }
    }
}

pub fn include_options_label(options: IncludeOptions) -> &'static str {
    match options {
        IncludeOptions::Default => "default",
        IncludeOptions::Always => "always",
        IncludeOptions::Never => "never",
    }
}

impl fmt::Display for SceneReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "  path:    {}", self.path)?;
        writeln!(f, "  id:      {}", self.id)?;
        if let Some(pov) = self.pov.name().filter(|name| !name.is_empty()) {
            writeln!(f, "  pov:     {pov}")?;
        }
        writeln!(f, "  words:   {}", self.words)?;
        if self.include {
            writeln!(
                f,
                "  export:  included (title: {}, break at end: {})",
                self.include_title, self.break_at_end
            )?;
        } else {
            writeln!(f, "  export:  excluded")?;
        }
        if !self.summary.trim().is_empty() {
            writeln!(f, "  summary: {}", self.summary.trim())?;
        }
        if !self.notes.trim().is_empty() {
            writeln!(f, "  notes:   {}", self.notes.trim())?;
        }
        if !self.extra_keys.is_empty() {
            writeln!(f, "  other keys: {}", self.extra_keys.join(", "))?;
        }
        if self.unsaved_changes {
            writeln!(f, "  (load fixups not yet saved)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::{CoreConfig, SceneTitle};
    use std::path::PathBuf;

    fn sample_scene() -> SceneFile {
        let mut scene = SceneFile::create(
            PathBuf::from("/story"),
            Some(SceneTitle::new("Arrival").unwrap()),
            Some(1),
            &CoreConfig::default(),
        );
        let document = scene.document_mut();
        document.metadata.id = "a1".into();
        document.metadata.summary = "Jun gets off the train.".into();
        document.metadata.pov = PovReference::new("Jun", "77");
        document
            .metadata
            .compile_status
            .set_include_title(IncludeOptions::Never);
        document
            .metadata
            .extra
            .insert("mood".into(), toml::Value::String("tense".into()));
        document.body = "The platform was empty.\n".into();
        scene
    }

    #[test]
    fn text_report_lists_set_properties() {
        let scene = sample_scene();
        let text = SceneReport::new(&scene).to_string();

        assert!(text.starts_with("Arrival\n"));
        assert!(text.contains("  id:      a1\n"));
        assert!(text.contains("  pov:     Jun\n"));
        assert!(text.contains("  words:   4\n"));
        assert!(text.contains("title: never, break at end: default"));
        assert!(text.contains("  other keys: mood\n"));
        assert!(!text.contains("notes:"));
    }

    #[test]
    fn toml_report_carries_the_pov_header_value() {
        let scene = sample_scene();
        let rendered = toml::to_string(&SceneReport::new(&scene)).expect("serialize");
        let table: toml::Table = rendered.parse().expect("valid toml");

        assert_eq!(table["pov"].as_str(), Some("[Jun|77]"));
        assert_eq!(table["include_title"].as_str(), Some("never"));
        assert_eq!(table["words"].as_integer(), Some(4));
        assert_eq!(table["unsaved_changes"].as_bool(), Some(true));
    }
}
