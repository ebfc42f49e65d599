use super::constants::{
    COMPILE_STATUS_KEY, DEFAULT_FILE_FORMAT_VERSION, FILE_FORMAT_VERSION_KEY, FILE_TYPE_KEY,
    HEADER_SPLIT, ID_KEY, NAME_KEY, NOTES_KEY, POV_KEY, RECOGNIZED_KEYS, SCENE_FILE_TYPE,
    SUMMARY_KEY,
};
use super::header::write_header;
use crate::{CompileStatus, FormatError, MalformedHeaderError, PovReference};
use std::str::FromStr;
use std::sync::LazyLock;
use toml::{Table, Value};

/// Metadata stored in the header of a scene file.
///
/// Every recognized key has a typed field that is always populated: keys missing from a file take
/// the values in [`default_metadata`]. Keys this version does not recognize are kept in `extra`
/// untouched and written back after the recognized ones.
///
/// `extra` must not contain any of [`RECOGNIZED_KEYS`]; such entries are skipped when writing.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneMetadata {
    /// Version of the file layout, reserved for detecting incompatible changes.
    pub file_format_version: u64,
    /// Title of the scene.
    pub name: String,
    /// Id unique across a project. Any string is accepted; the editor writes hyphenated UUIDv4.
    pub id: String,
    /// Kind of object stored in the file, `"scene"` for scenes.
    pub file_type: String,
    pub summary: String,
    pub notes: String,
    pub pov: PovReference,
    pub compile_status: CompileStatus,
    /// Header keys without a typed field, in file order.
    pub extra: Table,
}

/// A scene file held in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDocument {
    pub metadata: SceneMetadata,
    /// Markdown text, kept byte for byte.
    pub body: String,
}

static DEFAULT_METADATA: LazyLock<SceneMetadata> = LazyLock::new(|| SceneMetadata {
    file_format_version: DEFAULT_FILE_FORMAT_VERSION,
    name: String::new(),
    id: String::new(),
    file_type: SCENE_FILE_TYPE.to_owned(),
    summary: String::new(),
    notes: String::new(),
    pov: PovReference::None,
    compile_status: CompileStatus::INCLUDE,
    extra: Table::new(),
});

/// Values used for recognized keys that are absent from a header.
pub fn default_metadata() -> &'static SceneMetadata {
    &DEFAULT_METADATA
}

impl Default for SceneMetadata {
    fn default() -> Self {
        default_metadata().clone()
    }
}

impl SceneMetadata {
    fn from_table(mut table: Table) -> Result<Self, MalformedHeaderError> {
        let defaults = default_metadata();

        let file_format_version = match table.remove(FILE_FORMAT_VERSION_KEY) {
            Some(value) => take_u64(FILE_FORMAT_VERSION_KEY, value)?,
            None => defaults.file_format_version,
        };
        let name = take_string(NAME_KEY, table.remove(NAME_KEY), &defaults.name)?;
        let id = take_string(ID_KEY, table.remove(ID_KEY), &defaults.id)?;
        let file_type = take_string(
            FILE_TYPE_KEY,
            table.remove(FILE_TYPE_KEY),
            &defaults.file_type,
        )?;
        let summary = take_string(SUMMARY_KEY, table.remove(SUMMARY_KEY), &defaults.summary)?;
        let notes = take_string(NOTES_KEY, table.remove(NOTES_KEY), &defaults.notes)?;
        let pov = match table.remove(POV_KEY) {
            Some(Value::String(pov)) => PovReference::parse(&pov),
            Some(other) => return Err(invalid_field(POV_KEY, "a string", &other)),
            None => defaults.pov.clone(),
        };
        let compile_status = match table.remove(COMPILE_STATUS_KEY) {
            // Older files store a bool; negative integers carry the high bit through `i64`.
            Some(Value::Integer(bits)) => CompileStatus::from_bits_retain(bits as u64),
            Some(Value::Boolean(include)) => CompileStatus::from_legacy_bool(include),
            Some(other) => {
                return Err(invalid_field(
                    COMPILE_STATUS_KEY,
                    "an integer or a boolean",
                    &other,
                ))
            }
            None => defaults.compile_status,
        };

        Ok(Self {
            file_format_version,
            name,
            id,
            file_type,
            summary,
            notes,
            pov,
            compile_status,
            extra: table,
        })
    }

    fn to_table(&self) -> Result<Table, FormatError> {
        let version = i64::try_from(self.file_format_version).map_err(|_| {
            FormatError::ValueOutOfRange {
                key: FILE_FORMAT_VERSION_KEY,
                value: self.file_format_version,
            }
        })?;

        let mut table = Table::new();
        table.insert(FILE_FORMAT_VERSION_KEY.into(), Value::Integer(version));
        table.insert(NAME_KEY.into(), Value::String(self.name.clone()));
        table.insert(ID_KEY.into(), Value::String(self.id.clone()));
        table.insert(FILE_TYPE_KEY.into(), Value::String(self.file_type.clone()));
        table.insert(SUMMARY_KEY.into(), Value::String(self.summary.clone()));
        table.insert(NOTES_KEY.into(), Value::String(self.notes.clone()));
        table.insert(POV_KEY.into(), Value::String(self.pov.to_header_value()));
        table.insert(
            COMPILE_STATUS_KEY.into(),
            Value::Integer(self.compile_status.bits() as i64),
        );

        for (key, value) in &self.extra {
            if RECOGNIZED_KEYS.contains(&key.as_str()) {
                continue;
            }
            table.insert(key.clone(), value.clone());
        }

        Ok(table)
    }
}

impl SceneDocument {
    /// A new scene with default metadata and the given body.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            metadata: SceneMetadata::default(),
            body: body.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, FormatError> {
        read_markdown(input)
    }

    pub fn to_markdown(&self) -> Result<String, FormatError> {
        write_markdown(self)
    }
}

impl FromStr for SceneDocument {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        read_markdown(s)
    }
}

/// Read a scene from file contents.
///
/// Text without a header split line is treated as a body-only scene with default metadata, which
/// is how scenes created outside the editor look.
pub(crate) fn read_markdown(input: &str) -> Result<SceneDocument, FormatError> {
    let Some((header, body)) = split_header(input) else {
        return Ok(SceneDocument::new(input));
    };

    let table = header
        .parse::<Table>()
        .map_err(MalformedHeaderError::InvalidToml)?;
    let metadata = SceneMetadata::from_table(table)?;

    Ok(SceneDocument {
        metadata,
        body: body.to_owned(),
    })
}

/// Write a scene to file contents: header, split line, one blank line, body.
pub(crate) fn write_markdown(document: &SceneDocument) -> Result<String, FormatError> {
    let header = write_header(&document.metadata.to_table()?);

    let mut out = String::with_capacity(header.len() + document.body.len() + 16);
    out.push_str(&header);
    out.push_str(HEADER_SPLIT);
    out.push_str("\n\n");
    out.push_str(&document.body);
    Ok(out)
}

/// Split file contents at the first line that is exactly [`HEADER_SPLIT`].
///
/// The single blank line written after the split is not part of the body.
fn split_header(input: &str) -> Option<(&str, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut offset = 0;

    for chunk in input.split_inclusive('\n') {
        let line = chunk.trim_end_matches(['\n', '\r']);
        if line == HEADER_SPLIT {
            let header = &input[..offset];
            let rest = &input[offset + chunk.len()..];
            let body = rest
                .strip_prefix("\r\n")
                .or_else(|| rest.strip_prefix('\n'))
                .unwrap_or(rest);
            return Some((header, body));
        }
        offset += chunk.len();
    }

    None
}

fn take_string(
    key: &'static str,
    value: Option<Value>,
    default: &str,
) -> Result<String, MalformedHeaderError> {
    match value {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(invalid_field(key, "a string", &other)),
        None => Ok(default.to_owned()),
    }
}

fn take_u64(key: &'static str, value: Value) -> Result<u64, MalformedHeaderError> {
    match value {
        Value::Integer(value) => {
            u64::try_from(value).map_err(|_| MalformedHeaderError::NegativeInteger { key, value })
        }
        other => Err(invalid_field(key, "an integer", &other)),
    }
}

fn invalid_field(key: &'static str, expected: &'static str, found: &Value) -> MalformedHeaderError {
    MalformedHeaderError::InvalidField {
        key,
        expected,
        found: found.type_str(),
    }
}
