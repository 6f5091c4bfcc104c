//! Input escape notation and output stripping.
//!
//! Input sent to a session is written as text by the caller, so control
//! characters arrive as notations (`\r`, `\x1b[A`, ...) that must be turned
//! into real characters before reaching the PTY. Output read back from a
//! session goes the other way: escape sequences are removed so the caller
//! sees plain text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of characters returned by a session read.
pub const MAX_READ_CHARS: usize = 8192;

/// Prefix added to a read that was cut to [`MAX_READ_CHARS`].
pub const TRUNCATION_MARKER: &str = "...(truncated)...\n";

/// Rewrite escape notations into the characters they stand for.
///
/// Recognised, scanning left to right without overlap:
/// - `\r`, `\n`, `\t`
/// - `\xHH`: the character U+00HH (so `\x1b` is ESC)
/// - `\uHHHH`: the character with that code point
///
/// Anything else, including malformed hex or a code point that is not a
/// valid character, is left as written.
pub fn interpret_escapes(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' || i + 1 >= chars.len() {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let (replacement, consumed) = match chars[i + 1] {
            'r' => (Some('\r'), 2),
            'n' => (Some('\n'), 2),
            't' => (Some('\t'), 2),
            'x' => (hex_char(&chars[i + 2..], 2), 4),
            'u' => (hex_char(&chars[i + 2..], 4), 6),
            _ => (None, 0),
        };

        match replacement {
            Some(ch) => {
                out.push(ch);
                i += consumed;
            }
            None => {
                out.push('\\');
                i += 1;
            }
        }
    }

    out
}

/// Parse exactly `digits` hex digits from the start of `chars`.
fn hex_char(chars: &[char], digits: usize) -> Option<char> {
    let hex = chars.get(..digits)?;
    if !hex.iter().all(char::is_ascii_hexdigit) {
        return None;
    }
    let code = u32::from_str_radix(&hex.iter().collect::<String>(), 16).ok()?;
    char::from_u32(code)
}

static CSI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[a-zA-Z]").unwrap());
static OSC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)").unwrap());
static STRING_SEQ: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b[PX^_][^\x1b]*\x1b\\").unwrap());
static CHARSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b[()][AB0-2]").unwrap());
static SHORT_ESC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b[=>NOM78]").unwrap());
static CONTROL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x08\x0b\x0c\x0e-\x1f]").unwrap());

/// Remove escape sequences and non-printing control characters.
///
/// A fixed sequence of pattern passes, applied in order: CSI, OSC,
/// DCS/SOS/PM/APC strings, charset selection, short ESC forms, then any
/// remaining C0 control except tab, line feed and carriage return.
/// This is an approximation; sequences outside those forms may leave
/// fragments behind.
pub fn strip_ansi(input: &str) -> String {
    let passes: [&Regex; 6] = [&CSI, &OSC, &STRING_SEQ, &CHARSET, &SHORT_ESC, &CONTROL];
    passes
        .iter()
        .fold(input.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
}

/// Keep the last `max` characters of `content`, prefixed with
/// [`TRUNCATION_MARKER`] when anything was cut.
pub fn truncate_tail(content: &str, max: usize) -> String {
    let total = content.chars().count();
    if total <= max {
        return content.to_string();
    }
    let skip = total - max;
    let start = content
        .char_indices()
        .nth(skip)
        .map_or(content.len(), |(i, _)| i);
    format!("{}{}", TRUNCATION_MARKER, &content[start..])
}
