//! Helpers shared by the listing and article parsers.
//!
//! - Selector compilation with errors mapped into [`Error`]
//! - Backslash-escape decoding for script-call link payloads
//! - Inline `style` normalization
//! - String truncation for log fields

use crate::error::{Error, Result};
use scraper::Selector;

/// Compile a CSS selector from a site profile.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] naming the selector and the parser's
/// complaint.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Decode backslash escapes in a single-quoted script string literal.
///
/// Supports `\\`, `\'`, `\"`, `\/`, `\n`, `\r`, `\t`, `\xHH` and `\uHHHH`.
///
/// # Errors
///
/// Any other escape, or a dangling backslash, is reported as
/// [`Error::PageFormatChanged`]: the payload is not in the form the link
/// decoder understands and guessing would produce a wrong URL.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(decode_escapes(r"a\/b\x3d1").unwrap(), "a/b=1");
/// ```
pub fn decode_escapes(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next() {
            Some('\\') => '\\',
            Some('\'') => '\'',
            Some('"') => '"',
            Some('/') => '/',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('x') => hex_char(&mut chars, 2, s)?,
            Some('u') => hex_char(&mut chars, 4, s)?,
            Some(other) => {
                return Err(Error::PageFormatChanged(format!(
                    "unsupported escape \\{other} in link payload {s:?}"
                )));
            }
            None => {
                return Err(Error::PageFormatChanged(format!(
                    "dangling backslash in link payload {s:?}"
                )));
            }
        };
        out.push(decoded);
    }

    Ok(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize, whole: &str) -> Result<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.chars().count() != digits {
        return Err(Error::PageFormatChanged(format!(
            "truncated hex escape in link payload {whole:?}"
        )));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::PageFormatChanged(format!(
            "bad hex escape {hex:?} in link payload {whole:?}"
        )));
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| {
            Error::PageFormatChanged(format!("bad hex escape {hex:?} in link payload {whole:?}"))
        })
}

/// Normalize an inline `style` value for comparison.
///
/// Lowercases, drops all whitespace and trailing semicolons, so
/// `"Text-Align : justify;"` and `"text-align: justify"` compare equal.
pub fn normalize_style(style: &str) -> String {
    style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .trim_end_matches(';')
        .to_ascii_lowercase()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary) and
/// get `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
