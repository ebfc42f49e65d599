//! Scene files on disk.
//!
//! A [`SceneFile`] pairs a parsed [`SceneDocument`] with where it lives and whether the in-memory
//! copy has changes that still need writing.
//!
//! Loading applies two fixups to files written outside the editor, both of which mark the scene as
//! modified so the next save persists them:
//! - a scene without an `id` is given a fresh UUIDv4;
//! - a scene without a `name` takes one from its filename (`003-The_Docks.md` -> `The Docks`).
//!
//! Saving writes to a temporary file in the same directory and renames it over the target, so a
//! crash mid-save never leaves a truncated scene behind.

use crate::config::CoreConfig;
use crate::constants::{
    EMPTY_SCENE_NAME, RENAME_STAGING_SUFFIX, SCENE_EXTENSION, TEMP_FILE_SUFFIX,
};
use crate::naming::{index_from_name, name_from_file_stem, scene_file_name};
use crate::outline::word_count;
use crate::{QuireError, QuireResult};
use quire_format::v1::constants::SCENE_FILE_TYPE;
use quire_format::SceneDocument;
use quire_types::SceneTitle;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use uuid::Uuid;

/// Generates ids for scenes that do not have one yet.
pub fn new_scene_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

#[derive(Debug)]
pub struct SceneFile {
    /// Directory containing the file.
    dirname: PathBuf,
    /// Filename within `dirname`, including the extension.
    file_name: String,
    /// Position within the containing folder, if the filename carries one.
    index: Option<usize>,
    document: SceneDocument,
    /// Modification time of the file when it was last read or written.
    modtime: Option<SystemTime>,
    modified: bool,
}

impl SceneFile {
    /// Load a scene from disk, assigning a fresh id if it lacks one.
    pub fn load(path: &Path) -> QuireResult<Self> {
        Self::load_with_id_source(path, new_scene_id)
    }

    /// Load a scene from disk, drawing any missing id from `id_source`.
    pub fn load_with_id_source(
        path: &Path,
        mut id_source: impl FnMut() -> String,
    ) -> QuireResult<Self> {
        let (dirname, file_name) = split_scene_path(path)?;
        let (document, modtime) = read_scene(path)?;

        let mut scene = Self {
            dirname,
            index: index_from_name(&file_name),
            file_name,
            document,
            modtime,
            modified: false,
        };

        if scene.document.metadata.id.is_empty() {
            scene.document.metadata.id = id_source();
            scene.modified = true;
            tracing::debug!("assigned id {} to {}", scene.id(), path.display());
        }

        if scene.fill_name_from_file_name() {
            scene.modified = true;
        }

        Ok(scene)
    }

    /// Give a scene without a name the one its filename implies. Returns whether it changed.
    fn fill_name_from_file_name(&mut self) -> bool {
        if !self.document.metadata.name.is_empty() {
            return false;
        }

        let stem = Path::new(&self.file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = name_from_file_stem(&stem);
        if name.is_empty() {
            return false;
        }

        self.document.metadata.name = name;
        true
    }

    /// Create a new, unsaved scene in `dirname`.
    ///
    /// Scenes without a title display (and are named on disk) as `New Scene`.
    pub fn create(
        dirname: impl Into<PathBuf>,
        title: Option<SceneTitle>,
        index: Option<usize>,
        config: &CoreConfig,
    ) -> Self {
        let mut document = SceneDocument::new(String::new());
        document.metadata.id = new_scene_id();
        if let Some(title) = title {
            document.metadata.name = title.into_string();
        }

        let file_name = scene_file_name(
            &document.metadata.name,
            EMPTY_SCENE_NAME,
            index,
            config.filename_max_length(),
            SCENE_EXTENSION,
        );

        Self {
            dirname: dirname.into(),
            file_name,
            index,
            document,
            modtime: None,
            modified: true,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dirname.join(&self.file_name)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn id(&self) -> &str {
        &self.document.metadata.id
    }

    /// Scene name, or `New Scene` when it has none.
    pub fn title(&self) -> &str {
        let name = self.document.metadata.name.trim();
        if name.is_empty() {
            EMPTY_SCENE_NAME
        } else {
            name
        }
    }

    pub fn document(&self) -> &SceneDocument {
        &self.document
    }

    /// Mutable access to the document. The scene is treated as modified afterwards.
    pub fn document_mut(&mut self) -> &mut SceneDocument {
        self.modified = true;
        &mut self.document
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.document.body)
    }

    /// Move the scene to a new position in its folder. The file is renamed on the next save.
    pub fn set_index(&mut self, index: Option<usize>) {
        if self.index != index {
            self.index = index;
            self.modified = true;
        }
    }

    /// Filename this scene should have given its current name and index.
    pub fn calculate_file_name(&self, config: &CoreConfig) -> String {
        scene_file_name(
            &self.document.metadata.name,
            EMPTY_SCENE_NAME,
            self.index,
            config.filename_max_length(),
            SCENE_EXTENSION,
        )
    }

    /// Filename the scene will have after its next [`save`](Self::save).
    pub fn pending_file_name(&self, config: &CoreConfig) -> String {
        if self.modified {
            self.calculate_file_name(config)
        } else {
            self.file_name.clone()
        }
    }

    /// Move the file to a hidden staging name. The next save moves it to its real name.
    pub(crate) fn park(&mut self) -> QuireResult<()> {
        let staging_name = format!(".{}{}", self.file_name, RENAME_STAGING_SUFFIX);
        self.rename(staging_name)
    }

    /// Re-read the scene if the file changed on disk since it was last read or written.
    ///
    /// Returns whether the document was replaced. The copy on disk wins over unsaved in-memory
    /// changes. If the new contents lack an id the current one is kept, and a missing name is
    /// taken from the filename as on load.
    pub fn reload(&mut self) -> QuireResult<bool> {
        let path = self.path();
        let current = fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .map_err(QuireError::FileRead)?;

        if self.modtime == Some(current) {
            return Ok(false);
        }

        if self.modified {
            tracing::warn!(
                "{} changed on disk, discarding unsaved changes",
                path.display()
            );
        }

        let (mut document, modtime) = read_scene(&path)?;
        let mut modified = false;
        if document.metadata.id.is_empty() {
            document.metadata.id = self.document.metadata.id.clone();
            modified = true;
        }

        self.document = document;
        self.modtime = modtime;
        self.modified = self.fill_name_from_file_name() || modified;
        tracing::debug!("reloaded {}", path.display());

        Ok(true)
    }

    /// Write the scene if it has unsaved changes. Returns whether anything was written.
    ///
    /// The file is renamed first when its name or index no longer match the filename.
    pub fn save(&mut self, config: &CoreConfig) -> QuireResult<bool> {
        if !self.modified {
            return Ok(false);
        }

        let new_file_name = self.calculate_file_name(config);
        if new_file_name != self.file_name {
            self.rename(new_file_name)?;
        }

        self.write_in_place()?;
        Ok(true)
    }

    /// Write the scene to its current path, whether or not it has changes, without renaming.
    pub fn write_in_place(&mut self) -> QuireResult<()> {
        let contents = self.document.to_markdown()?;
        let path = self.path();
        write_with_temp_file(&path, &contents)?;

        let modtime = fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .map_err(QuireError::FileRead)?;
        tracing::debug!("wrote {} with modtime {:?}", path.display(), modtime);

        self.modtime = Some(modtime);
        self.modified = false;
        Ok(())
    }

    fn rename(&mut self, new_file_name: String) -> QuireResult<()> {
        let old_path = self.path();
        let new_path = self.dirname.join(&new_file_name);

        if new_path.exists() {
            return Err(QuireError::InvalidInput(format!(
                "cannot rename {} to {}: target already exists",
                old_path.display(),
                new_path.display()
            )));
        }

        // Scenes that were never saved have nothing on disk to move.
        if old_path.exists() {
            fs::rename(&old_path, &new_path).map_err(|source| QuireError::FileRename {
                from: old_path.clone(),
                to: new_path.clone(),
                source,
            })?;
            tracing::debug!("moved {} to {}", old_path.display(), new_path.display());
        }

        self.file_name = new_file_name;
        Ok(())
    }
}

/// Split a scene path into its directory and filename, checking the extension.
fn split_scene_path(path: &Path) -> QuireResult<(PathBuf, String)> {
    let is_scene = path
        .extension()
        .is_some_and(|extension| extension == SCENE_EXTENSION);
    let file_name = path.file_name().and_then(|name| name.to_str());

    match (is_scene, file_name) {
        (true, Some(file_name)) => {
            let dirname = path.parent().map(Path::to_path_buf).unwrap_or_default();
            Ok((dirname, file_name.to_owned()))
        }
        _ => Err(QuireError::InvalidPath(path.to_path_buf())),
    }
}

fn read_scene(path: &Path) -> QuireResult<(SceneDocument, Option<SystemTime>)> {
    let contents = fs::read_to_string(path).map_err(QuireError::FileRead)?;
    let modtime = fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok();

    let document = SceneDocument::parse(&contents).map_err(|err| {
        tracing::warn!("failed to parse {}: {}", path.display(), err);
        QuireError::from(err)
    })?;

    if document.metadata.file_type != SCENE_FILE_TYPE {
        return Err(QuireError::NotAScene {
            path: path.to_path_buf(),
            file_type: document.metadata.file_type,
        });
    }

    Ok((document, modtime))
}

/// Write `contents` to a sibling temporary file, then rename it over `path`.
fn write_with_temp_file(path: &Path, contents: &str) -> QuireResult<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| QuireError::InvalidPath(path.to_path_buf()))?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(TEMP_FILE_SUFFIX);
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents).map_err(QuireError::FileWrite)?;
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(QuireError::FileWrite(err));
    }

    Ok(())
}
