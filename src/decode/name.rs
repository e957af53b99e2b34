//! Path cleanup, percent-decoding and collision-free naming.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use percent_encoding::percent_decode_str;
use serde::Deserialize;

use crate::insert_suffix_before_extension;

/// Non-breaking space that macOS injects into dragged file paths.
const NO_BREAK_SPACE: char = '\u{a0}';

/// How a counter is added to a name that already exists in the target directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NamingStyle {
    /// `name_copy1.ext`, `name_copy2.ext`, ...
    #[default]
    Copy,
    /// `name(1).ext`, `name(2).ext`, ...
    #[serde(alias = "paren")]
    #[value(alias = "paren")]
    Parenthesized,
}

impl NamingStyle {
    /// Suffix for the given counter value.
    #[must_use]
    pub fn suffix(self, counter: usize) -> String {
        match self {
            Self::Copy => format!("_copy{counter}"),
            Self::Parenthesized => format!("({counter})"),
        }
    }

    /// Candidate file name for the given counter value.
    #[must_use]
    pub fn numbered_name(self, file_name: &str, counter: usize) -> String {
        insert_suffix_before_extension(file_name, &self.suffix(counter))
    }
}

/// Clean up a raw path from a drop payload or file picker.
///
/// Strips enclosing brace characters and replaces non-breaking spaces with regular spaces.
///
/// ```rust
/// use fndecode::decode::normalize_path;
///
/// assert_eq!(normalize_path("{/Users/me/My\u{a0}File.txt}"), "/Users/me/My File.txt");
/// assert_eq!(normalize_path("/tmp/plain.txt"), "/tmp/plain.txt");
/// ```
#[must_use]
pub fn normalize_path(raw_path: &str) -> String {
    raw_path
        .trim_matches(|c| c == '{' || c == '}')
        .replace(NO_BREAK_SPACE, " ")
}

/// Percent-decode a file name.
///
/// Invalid UTF-8 byte sequences become U+FFFD and malformed escapes are kept as is.
/// Decoded characters are not renormalized,
/// so names without a valid escape are returned unchanged.
///
/// ```rust
/// use fndecode::decode::decode_name;
///
/// assert_eq!(decode_name("Hello%20World.txt"), "Hello World.txt");
/// assert_eq!(decode_name("100%.txt"), "100%.txt");
/// ```
#[must_use]
pub fn decode_name(file_name: &str) -> String {
    if !file_name.contains('%') {
        return file_name.to_string();
    }
    percent_decode_str(file_name).decode_utf8_lossy().into_owned()
}

/// Decode only the file name component of a path.
/// The directory part is never touched.
/// Bytes that are not valid UTF-8 become U+FFFD.
#[must_use]
pub fn decoded_file_name(path: &Path) -> String {
    decode_name(&path.file_name().unwrap_or_default().to_string_lossy())
}

/// Check that a decoded name can be used as a single path component.
///
/// Rejects empty names, `.` and `..`, and names that would create a path,
/// such as a decoded `%2F`.
#[must_use]
pub fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\0'])
        && !name.contains(std::path::MAIN_SEPARATOR)
}

/// Split a drag-and-drop payload into individual paths.
///
/// Paths are separated by whitespace and paths containing spaces are wrapped in braces.
/// An unclosed brace takes the rest of the payload.
///
/// ```rust
/// use fndecode::decode::parse_drop_payload;
///
/// let paths = parse_drop_payload("{/tmp/My File.txt} /tmp/other.txt");
/// assert_eq!(paths, vec!["/tmp/My File.txt", "/tmp/other.txt"]);
/// ```
#[must_use]
pub fn parse_drop_payload(data: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut chars = data.chars().peekable();
    while let Some(&next) = chars.peek() {
        if next.is_ascii_whitespace() {
            chars.next();
            continue;
        }
        let token: String = if next == '{' {
            chars.next();
            chars.by_ref().take_while(|&c| c != '}').collect()
        } else {
            chars.by_ref().take_while(|c| !c.is_ascii_whitespace()).collect()
        };
        if !token.is_empty() {
            paths.push(token);
        }
    }
    paths
}

/// Get a file name that does not exist yet in the given directory.
///
/// Returns `desired_name` when it is free.
/// Otherwise tries numbered names starting from 1 and returns the first free one.
#[must_use]
pub fn unique_file_name(directory: &Path, desired_name: &str, style: NamingStyle) -> String {
    first_free_name(directory, desired_name, style, entry_exists)
}

/// Same as [`unique_file_name`] with a caller supplied check for taken paths.
pub(crate) fn first_free_name(
    directory: &Path,
    desired_name: &str,
    style: NamingStyle,
    is_taken: impl Fn(&Path) -> bool,
) -> String {
    if !is_taken(&directory.join(desired_name)) {
        return desired_name.to_string();
    }
    let mut counter: usize = 1;
    loop {
        let candidate = style.numbered_name(desired_name, counter);
        if !is_taken(&directory.join(&candidate)) {
            return candidate;
        }
        counter += 1;
    }
}

/// Broken symlinks count as existing entries.
pub(crate) fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
