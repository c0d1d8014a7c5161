//! Line-level character replacement.
//!
//! Content is split into raw lines that keep their terminators. Each line is
//! fixed with its terminator stripped, then the identical terminator is put
//! back, so joining the fixed lines changes nothing but the replaced
//! characters. Line endings, final-newline presence and a leading BOM all
//! survive untouched.

use crate::replacements::ReplacementMap;

/// Replaces every character of `line` that is a key in `map`.
///
/// `line` must not include its terminator. Characters not in the map pass
/// through unchanged.
pub fn fix_line(line: &str, map: &ReplacementMap) -> String {
    line.chars().map(|c| map.get(c).unwrap_or(c)).collect()
}

/// Splits `content` into lines, each keeping its `\n` or `\r\n`.
///
/// A final segment without a newline is returned as its own line. Empty
/// content yields no lines. `split_lines(s).concat() == s` always holds.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

/// Splits a raw line into its body and terminator.
pub fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}

/// Fixes one raw line, preserving its terminator.
pub fn fix_raw_line(raw: &str, map: &ReplacementMap) -> String {
    let (body, terminator) = split_terminator(raw);
    let mut fixed = fix_line(body, map);
    fixed.push_str(terminator);
    fixed
}
