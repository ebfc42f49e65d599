//! Scene filename conventions.
//!
//! Scenes inside a folder are stored as `NNN-Name_With_Underscores.md`, where `NNN` is the scene's
//! zero-padded position in its folder. These helpers derive filenames from names and recover
//! names and positions from filenames written by the editor or by hand.

/// Characters replaced by `-` in filenames, in addition to ASCII control characters.
const FILENAME_UNSAFE_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Shorten `name` to at most `max_length` bytes, preferring to cut on word boundaries.
///
/// Leading and trailing whitespace is ignored. If even the first word is too long the name is cut
/// at the last character boundary that fits.
pub fn truncate_name(name: &str, max_length: usize) -> &str {
    let name = name.trim();
    if name.len() <= max_length {
        return name;
    }

    // Longest prefix ending just before a space that is strictly shorter than the limit.
    let word_cut = name
        .char_indices()
        .filter(|(_, c)| *c == ' ')
        .map(|(index, _)| index)
        .take_while(|index| *index < max_length)
        .filter(|index| !name[..*index].trim().is_empty())
        .last();

    match word_cut {
        Some(index) => name[..index].trim_end(),
        None => {
            let mut end = max_length;
            while !name.is_char_boundary(end) {
                end -= 1;
            }
            &name[..end]
        }
    }
}

/// Translate a name into something safe to put on disk.
pub fn process_name_for_filename(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '\'')
        .map(|c| match c {
            ' ' => '_',
            c if FILENAME_UNSAFE_CHARS.contains(&c) || c.is_ascii_control() => '-',
            c => c,
        })
        .collect()
}

/// Prefix a name with its zero-padded index.
pub fn add_index_to_name(name: &str, index: usize) -> String {
    format!("{index:03}-{name}")
}

/// Read the index prefix of a filename (`"012-Name.md"` -> `Some(12)`).
pub fn index_from_name(file_name: &str) -> Option<usize> {
    let (prefix, _) = file_name.split_once('-')?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

/// Recover a display name from a filename stem written by [`scene_file_name`] or by hand.
///
/// The index prefix is dropped, underscores become spaces and the result is trimmed.
pub fn name_from_file_stem(stem: &str) -> String {
    let without_index = match stem.split_once('-') {
        Some((_, rest)) if index_from_name(stem).is_some() => rest,
        _ => stem,
    };

    without_index.replace('_', " ").trim().to_string()
}

/// Full filename (with extension) for a scene.
///
/// `empty_name` stands in when `name` is blank. Indexed scenes have their name truncated to
/// `max_length` before the index is added.
pub fn scene_file_name(
    name: &str,
    empty_name: &str,
    index: Option<usize>,
    max_length: usize,
    extension: &str,
) -> String {
    let base_name = if name.trim().is_empty() {
        empty_name
    } else {
        name
    };

    let processed = match index {
        Some(_) => process_name_for_filename(truncate_name(base_name, max_length)),
        None => process_name_for_filename(base_name.trim()),
    };
    // Names made only of dropped characters, like a lone apostrophe.
    let processed = if processed.is_empty() {
        process_name_for_filename(empty_name)
    } else {
        processed
    };
    // Keep the file visible to folder scans.
    let processed = match processed.strip_prefix('.') {
        Some(rest) => format!("-{rest}"),
        None => processed,
    };

    let stem = match index {
        Some(index) => add_index_to_name(&processed, index),
        None => processed,
    };

    format!("{stem}.{extension}")
}
