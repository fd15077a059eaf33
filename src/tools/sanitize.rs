use regex::Regex;
use std::sync::OnceLock;

/// Prefix that makes a spreadsheet store the value as literal text.
pub const LITERAL_TEXT_MARKER: char = '\'';

const QUOTE_CHARS: &[char] = &['"', '\'', '`', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];
const FORMULA_LEADERS: &[char] = &['=', '+', '-'];

fn line_breaks() -> &'static Regex {
    static LINE_BREAKS: OnceLock<Regex> = OnceLock::new();
    LINE_BREAKS.get_or_init(|| Regex::new(r"\s*[\r\n]+\s*").expect("valid line-break pattern"))
}

/// Cleans free-text contact details before they are written to the sheet.
///
/// Trims, folds line breaks into a single space, drops quote characters and
/// neutralises a leading formula character.
pub fn sanitize_contact_info(input: &str) -> String {
    let single_line = line_breaks().replace_all(input.trim(), " ");
    let unquoted: String = single_line.chars().filter(|c| !QUOTE_CHARS.contains(c)).collect();
    let cleaned = unquoted.trim();

    if cleaned.starts_with(FORMULA_LEADERS) {
        format!("{}{}", LITERAL_TEXT_MARKER, cleaned)
    } else {
        cleaned.to_string()
    }
}
