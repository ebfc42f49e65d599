use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum QuireError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not a scene file path: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("failed to read scene file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write scene file: {0}")]
    FileWrite(std::io::Error),
    #[error(
        "failed to rename {} to {}: {source}",
        from.display(),
        to.display()
    )]
    FileRename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read directory {}: {source}", path.display())]
    DirRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} holds a `{file_type}` object, not a scene", path.display())]
    NotAScene { path: PathBuf, file_type: String },
    #[error("scene file format error: {0}")]
    Format(#[from] quire_format::FormatError),
    #[error("invalid scene title: {0}")]
    InvalidTitle(#[from] quire_types::TextError),
}

pub type QuireResult<T> = std::result::Result<T, QuireError>;
