//! Point-of-view character references.
//!
//! A scene names its point-of-view character with a short reference string. The canonical form
//! is `[name|id]`, where `id` is the character's object id and `name` is a readable copy of its
//! name at the time of writing. Hand-written files often contain just a name, so the reader also
//! accepts `name`, `[name]` and `name|id`.

use std::fmt;

/// Characters that cannot appear in the name part of a reference.
const RESERVED_NAME_CHARS: [char; 3] = ['|', '[', ']'];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PovReference {
    #[default]
    None,
    Named(NamedPov),
}

/// Name and id of a point-of-view character.
///
/// Only built through [`PovReference::new`] and [`PovReference::parse`], so the name never holds a
/// character the header syntax reserves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedPov {
    name: String,
    id: String,
}

impl NamedPov {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl PovReference {
    /// Build a reference, stripping characters the on-disk syntax reserves from `name`.
    ///
    /// Returns [`PovReference::None`] when both parts end up empty.
    pub fn new(name: impl AsRef<str>, id: impl Into<String>) -> Self {
        let name: String = name
            .as_ref()
            .chars()
            .filter(|c| !RESERVED_NAME_CHARS.contains(c))
            .collect();
        let id = id.into();

        if name.is_empty() && id.is_empty() {
            PovReference::None
        } else {
            PovReference::Named(NamedPov { name, id })
        }
    }

    /// Read a reference from its header value. Never fails; unknown shapes become a bare name.
    pub fn parse(value: &str) -> Self {
        let inner = value
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(value);

        match inner.split_once('|') {
            Some((name, id)) => PovReference::new(name, id),
            None => PovReference::new(inner, String::new()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PovReference::None)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PovReference::None => None,
            PovReference::Named(named) => Some(named.name()),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            PovReference::None => None,
            PovReference::Named(named) => Some(named.id()),
        }
    }

    /// Header value for this reference: empty for `None`, `[name|id]` otherwise.
    pub fn to_header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PovReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PovReference::None => Ok(()),
            PovReference::Named(NamedPov { name, id }) => write!(f, "[{name}|{id}]"),
        }
    }
}

impl serde::Serialize for PovReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_header_value())
    }
}

impl<'de> serde::Deserialize<'de> for PovReference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(PovReference::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_none() {
        assert_eq!(PovReference::parse(""), PovReference::None);
        assert_eq!(PovReference::parse("[]"), PovReference::None);
        assert_eq!(PovReference::parse("[|]"), PovReference::None);
        assert_eq!(PovReference::parse("|"), PovReference::None);
    }

    #[test]
    fn reads_canonical_form() {
        let pov = PovReference::parse("[Mara|4f1c0d2e-aaaa-bbbb-cccc-0123456789ab]");
        assert_eq!(pov.name(), Some("Mara"));
        assert_eq!(pov.id(), Some("4f1c0d2e-aaaa-bbbb-cccc-0123456789ab"));
    }

    #[test]
    fn reads_hand_written_forms() {
        assert_eq!(PovReference::parse("Mara"), PovReference::new("Mara", ""));
        assert_eq!(PovReference::parse("[Mara]"), PovReference::new("Mara", ""));
        assert_eq!(PovReference::parse("Mara|42"), PovReference::new("Mara", "42"));
        assert_eq!(PovReference::parse("[|42]"), PovReference::new("", "42"));
    }

    #[test]
    fn writes_canonical_form() {
        assert_eq!(PovReference::None.to_header_value(), "");
        assert_eq!(PovReference::new("Mara", "42").to_header_value(), "[Mara|42]");
        assert_eq!(PovReference::new("Mara", "").to_header_value(), "[Mara|]");
    }

    #[test]
    fn reserved_characters_are_stripped_from_names() {
        let pov = PovReference::new("[Old|Tom]", "7");
        assert_eq!(pov.name(), Some("OldTom"));
        assert_eq!(PovReference::parse(&pov.to_header_value()), pov);
    }

    #[test]
    fn written_references_read_back_unchanged() {
        for pov in [
            PovReference::None,
            PovReference::new("Mara", ""),
            PovReference::new("", "abc"),
            PovReference::new("Captain Ilse", "id|with|pipes"),
        ] {
            assert_eq!(PovReference::parse(&pov.to_header_value()), pov);
        }
    }

    #[test]
    fn named_references_never_hold_reserved_characters() {
        let built = [
            PovReference::new("a|b", "c"),
            PovReference::new("[x]", "y"),
            PovReference::parse("[a|b|c]"),
            PovReference::parse("[[Mara]]|1"),
            PovReference::parse("Ma]ra"),
        ];

        for pov in built {
            let PovReference::Named(named) = &pov else {
                panic!("expected a named reference: {pov:?}");
            };
            assert!(
                !named.name().contains(RESERVED_NAME_CHARS),
                "reserved character in {:?}",
                named.name()
            );
            assert_eq!(PovReference::parse(&pov.to_header_value()), pov);
        }
    }
}
