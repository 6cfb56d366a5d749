//! RTF to plain text by stripping control sequences.
//!
//! This is a regex pass, not an RTF parser: group contents such as font
//! tables survive as text and `\'hh` escapes are not decoded.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:par|line)\b\s?").expect("valid paragraph regex"));
static CONTROL_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-z]+\d*\s?").expect("valid control word regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip RTF markup: control words, braces and stray backslashes are
/// removed and whitespace collapses to single spaces.
pub fn strip_rtf(rtf: &str) -> String {
    let text = PARAGRAPH.replace_all(rtf, " ");
    let text = CONTROL_WORD.replace_all(&text, "");
    let text: String = text
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '\\'))
        .collect();
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
