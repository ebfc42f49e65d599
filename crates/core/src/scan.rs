//! Listing the scenes of a folder.
//!
//! Scenes are ordered by the index prefix of their filenames. Files without a prefix (typically
//! dropped in from outside the editor) follow the indexed ones in filename order, and
//! [`renumber`] can then give every scene a contiguous index.

use crate::config::CoreConfig;
use crate::constants::SCENE_EXTENSION;
use crate::naming::index_from_name;
use crate::scene_file::SceneFile;
use crate::{QuireError, QuireResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of scanning a folder.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Loaded scenes in folder order.
    pub scenes: Vec<SceneFile>,
    /// Scene files that could not be loaded, with the reason.
    pub failures: Vec<(PathBuf, QuireError)>,
}

/// Load every scene file directly inside `dir`.
///
/// Directories, hidden files and files with other extensions are skipped. Files that fail to load
/// are reported in [`ScanResult::failures`] rather than aborting the scan.
pub fn scan_scenes(dir: &Path) -> QuireResult<ScanResult> {
    let entries = fs::read_dir(dir).map_err(|source| QuireError::DirRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut indexed: Vec<(usize, String, PathBuf)> = Vec::new();
    let mut unindexed: Vec<(String, PathBuf)> = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("could not read entry in {}: {}", dir.display(), err);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            tracing::warn!("skipping file without a valid unicode name: {}", path.display());
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }
        if path.extension().map_or(true, |extension| extension != SCENE_EXTENSION) {
            tracing::debug!("skipping {} with unknown extension", path.display());
            continue;
        }

        let file_name = file_name.to_owned();
        match index_from_name(&file_name) {
            Some(index) => indexed.push((index, file_name, path)),
            None => unindexed.push((file_name, path)),
        }
    }

    indexed.sort();
    unindexed.sort();

    let ordered = indexed
        .into_iter()
        .map(|(_, _, path)| path)
        .chain(unindexed.into_iter().map(|(_, path)| path));

    let mut result = ScanResult::default();
    for path in ordered {
        match SceneFile::load(&path) {
            Ok(scene) => result.scenes.push(scene),
            Err(err) => {
                tracing::warn!("found invalid scene while scanning {}: {}", dir.display(), err);
                result.failures.push((path, err));
            }
        }
    }

    Ok(result)
}

/// Give `scenes` the indexes `0..len` in their current order.
///
/// Returns how many scenes changed position; those are renamed on their next save.
pub fn renumber(scenes: &mut [SceneFile]) -> usize {
    let mut changed = 0;
    for (index, scene) in scenes.iter_mut().enumerate() {
        if scene.index() != Some(index) {
            scene.set_index(Some(index));
            changed += 1;
        }
    }
    changed
}

/// Save every scene in `scenes`, renaming files to match their names and indexes.
///
/// All target filenames are checked before anything on disk changes: two scenes may not end up
/// with the same filename, and no scene may be moved over a file outside `scenes`. Files that
/// move are parked under hidden names first, so a scene can take a name another scene is about to
/// give up. Returns how many scenes were written.
pub fn save_all(scenes: &mut [SceneFile], config: &CoreConfig) -> QuireResult<usize> {
    let current: HashSet<PathBuf> = scenes.iter().map(SceneFile::path).collect();
    let mut targets = HashSet::new();

    for scene in scenes.iter() {
        let path = scene.path();
        let target = path.with_file_name(scene.pending_file_name(config));
        if !targets.insert(target.clone()) {
            return Err(QuireError::InvalidInput(format!(
                "more than one scene would be saved as {}",
                target.display()
            )));
        }
        if target != path && target.exists() && !current.contains(&target) {
            return Err(QuireError::InvalidInput(format!(
                "cannot rename {} to {}: target already exists",
                path.display(),
                target.display()
            )));
        }
    }

    for scene in scenes.iter_mut() {
        if scene.pending_file_name(config) != scene.file_name() {
            scene.park()?;
        }
    }

    let mut written = 0;
    for scene in scenes.iter_mut() {
        if scene.save(config)? {
            written += 1;
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_scene(dir: &Path, file_name: &str, name: &str) {
        fs::write(
            dir.join(file_name),
            format!("name = \"{name}\"\nid = \"{name}-id\"\n++++++++\n\n{name} text\n"),
        )
        .expect("Failed to write scene");
    }

    fn titles(result: &ScanResult) -> Vec<&str> {
        result.scenes.iter().map(SceneFile::title).collect()
    }

    #[test]
    fn orders_indexed_then_unindexed() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path();
        write_scene(dir, "010-Ten.md", "Ten");
        write_scene(dir, "002-Two.md", "Two");
        write_scene(dir, "Zebra.md", "Zebra");
        write_scene(dir, "Apple.md", "Apple");
        write_scene(dir, "000-Zero.md", "Zero");

        let result = scan_scenes(dir).expect("scan");
        assert!(result.failures.is_empty());
        assert_eq!(titles(&result), vec!["Zero", "Two", "Ten", "Apple", "Zebra"]);
    }

    #[test]
    fn skips_other_files_and_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path();
        write_scene(dir, "001-Kept.md", "Kept");
        fs::write(dir.join("metadata.toml"), "name = \"folder\"\n").unwrap();
        fs::write(dir.join("notes.txt"), "loose notes").unwrap();
        fs::write(dir.join(".001-Kept.md.tmp"), "partial").unwrap();
        fs::write(dir.join(".hidden.md"), "hidden").unwrap();
        fs::create_dir(dir.join("002-Subfolder.md")).unwrap();

        let result = scan_scenes(dir).expect("scan");
        assert_eq!(titles(&result), vec!["Kept"]);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn reports_invalid_scenes_without_aborting() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path();
        write_scene(dir, "001-Good.md", "Good");
        fs::write(dir.join("002-Bad.md"), "name = = 1\n++++++++\n\n").unwrap();

        let result = scan_scenes(dir).expect("scan");
        assert_eq!(titles(&result), vec!["Good"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].0, dir.join("002-Bad.md"));
        assert!(matches!(result.failures[0].1, QuireError::Format(_)));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = scan_scenes(&temp_dir.path().join("nope")).expect_err("should fail");
        assert!(matches!(err, QuireError::DirRead { .. }));
    }

    #[test]
    fn renumber_fills_gaps_and_renames_on_save() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path();
        let cfg = CoreConfig::new(dir.to_path_buf(), 30).unwrap();
        write_scene(dir, "000-Zero.md", "Zero");
        write_scene(dir, "005-Five.md", "Five");
        write_scene(dir, "Loose.md", "Loose");

        let mut result = scan_scenes(dir).expect("scan");
        assert_eq!(renumber(&mut result.scenes), 2);
        assert_eq!(save_all(&mut result.scenes, &cfg).expect("save"), 2);

        assert_eq!(file_names(dir), vec!["000-Zero.md", "001-Five.md", "002-Loose.md"]);
        assert_eq!(renumber(&mut result.scenes), 0);
    }

    #[test]
    fn renumber_shifts_scenes_into_names_still_in_use() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path();
        let cfg = CoreConfig::new(dir.to_path_buf(), 30).unwrap();
        fs::write(dir.join("000-A.md"), "name = \"A\"\nid = \"a\"\n++++++++\n\n").unwrap();
        fs::write(dir.join("000-B.md"), "name = \"B\"\nid = \"b1\"\n++++++++\n\n").unwrap();
        fs::write(dir.join("001-B.md"), "name = \"B\"\nid = \"b2\"\n++++++++\n\n").unwrap();

        let mut result = scan_scenes(dir).expect("scan");
        assert_eq!(renumber(&mut result.scenes), 2);
        save_all(&mut result.scenes, &cfg).expect("save");

        assert_eq!(file_names(dir), vec!["000-A.md", "001-B.md", "002-B.md"]);
        assert_eq!(SceneFile::load(&dir.join("000-A.md")).unwrap().id(), "a");
        assert_eq!(SceneFile::load(&dir.join("001-B.md")).unwrap().id(), "b1");
        assert_eq!(SceneFile::load(&dir.join("002-B.md")).unwrap().id(), "b2");
    }

    #[test]
    fn save_all_refuses_colliding_names_before_touching_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path();
        let cfg = CoreConfig::new(dir.to_path_buf(), 30).unwrap();
        write_scene(dir, "001-One.md", "One");
        write_scene(dir, "002-One.md", "One");
        fs::write(dir.join("003-One.md"), "name = [\n++++++++\n\n").unwrap();

        let mut result = scan_scenes(dir).expect("scan");
        assert_eq!(result.failures.len(), 1);
        result.scenes[1].set_index(Some(1));
        let err = save_all(&mut result.scenes, &cfg).expect_err("duplicate target");
        assert!(matches!(err, QuireError::InvalidInput(msg) if msg.contains("more than one")));

        let mut result = scan_scenes(dir).expect("scan");
        result.scenes[1].set_index(Some(3));
        let err = save_all(&mut result.scenes, &cfg).expect_err("occupied target");
        assert!(matches!(err, QuireError::InvalidInput(msg) if msg.contains("already exists")));

        assert_eq!(file_names(dir), vec!["001-One.md", "002-One.md", "003-One.md"]);
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("Failed to read dir")
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
