//! Artifact naming and sanitization.
//!
//! Screenshot and recording names come from the caller and end up as file
//! stems, so they are transliterated and cleaned before use. Missing names
//! default to `<kind>_<unix-millis>`.

use deunicode::deunicode;

/// Windows reserved device names that cannot be used as filenames.
const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Characters that are invalid in filenames on common filesystems.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Longest stem kept, leaving room for an extension within the 255 byte limit.
const MAX_STEM_LENGTH: usize = 200;

/// What an artifact is, used for default names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Screenshot,
    Recording,
}

impl ArtifactKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ArtifactKind::Screenshot => "screenshot",
            ArtifactKind::Recording => "recording",
        }
    }
}

/// Sanitizes a string for use as a file stem.
///
/// Applies the following transformations in order:
/// 1. Unicode → ASCII transliteration
/// 2. Whitespace → hyphens
/// 3. Invalid filesystem characters removed
/// 4. Multiple hyphens collapsed to single
/// 5. Leading/trailing dots, spaces, hyphens trimmed
/// 6. Windows reserved names prefixed with `_`
/// 7. Truncated to a safe length
///
/// Returns `None` when nothing usable is left.
pub fn sanitize(input: &str) -> Option<String> {
    let ascii = deunicode(input);

    let mut result = String::with_capacity(ascii.len());
    let mut last_was_hyphen = false;

    for c in ascii.chars() {
        if c.is_whitespace() || c == '-' {
            if !last_was_hyphen {
                result.push('-');
                last_was_hyphen = true;
            }
        } else if INVALID_CHARS.contains(&c) {
            continue;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            result.push(c);
            last_was_hyphen = false;
        }
        // Anything else that survived transliteration is dropped
    }

    let trimmed = trim_edges(&result);
    let named = handle_reserved_name(trimmed);
    let truncated: String = named.chars().take(MAX_STEM_LENGTH).collect();
    let truncated = trim_edges(&truncated);

    if truncated.is_empty() {
        None
    } else {
        Some(truncated.to_string())
    }
}

/// Default stem for an artifact created at `unix_millis`.
pub fn default_name(kind: ArtifactKind, unix_millis: i64) -> String {
    format!("{}_{}", kind.prefix(), unix_millis)
}

/// Resolve the stem for an artifact: the sanitized `requested` name, or a
/// timestamped default when none was given or it sanitized to nothing.
pub fn artifact_name(requested: Option<&str>, kind: ArtifactKind) -> String {
    requested
        .and_then(sanitize)
        .unwrap_or_else(|| default_name(kind, chrono::Utc::now().timestamp_millis()))
}

/// Trims leading and trailing dots, spaces, and hyphens.
fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c| c == '.' || c == ' ' || c == '-')
}

/// Checks if a name is a Windows reserved name and prefixes it if so.
///
/// Handles both exact matches (CON) and names with extensions (CON.txt).
fn handle_reserved_name(name: &str) -> String {
    let base_name = match name.find('.') {
        Some(pos) => &name[..pos],
        None => name,
    };

    let upper = base_name.to_uppercase();
    if WINDOWS_RESERVED.iter().any(|r| upper == *r) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}
