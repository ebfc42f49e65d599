/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// Titles are single-line; the input contained a line break
    #[error("Title cannot span multiple lines")]
    MultiLine,
    /// The input contained a control character other than a line break
    #[error("Title cannot contain control character {0:?}")]
    ControlCharacter(char),
}

/// A scene title entered by a user.
///
/// Titles end up both in the scene header and in the scene's filename, so they must be a single
/// line of printable text. The input is trimmed of leading and trailing whitespace during
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneTitle(String);

impl SceneTitle {
    /// Creates a new `SceneTitle` from the given input.
    ///
    /// # Errors
    ///
    /// - [`TextError::Empty`] if the trimmed input is empty
    /// - [`TextError::MultiLine`] if it contains `\n` or `\r`
    /// - [`TextError::ControlCharacter`] for any other control character
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(TextError::MultiLine);
        }
        if let Some(c) = trimmed.chars().find(|c| c.is_control()) {
            return Err(TextError::ControlCharacter(c));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SceneTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SceneTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for SceneTitle {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneTitle::new(s)
    }
}

impl serde::Serialize for SceneTitle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SceneTitle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SceneTitle::new(&s).map_err(serde::de::Error::custom)
    }
}
