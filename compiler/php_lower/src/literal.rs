//! Literal text to typed constants.
//!
//! Integer literals accept decimal, `0x` hex, `0b` binary, `0o` and
//! leading-`0` octal, with `_` allowed between digits. A value too large
//! for `i64` becomes a float, as in PHP.

/// A parsed numeric or boolean literal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Parse integer literal text. `None` if the text is malformed.
pub fn parse_int(text: &str) -> Option<Literal> {
    let (radix, body) = split_radix(text);
    let digits = strip_separators(body, radix)?;
    if let Ok(value) = i64::from_str_radix(&digits, radix) {
        return Some(Literal::Int(value));
    }
    // Only overflow is left; the digits were already validated.
    let value = if radix == 10 {
        digits.parse::<f64>().ok()?
    } else {
        digits.chars().fold(0.0, |acc, c| {
            acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
        })
    };
    Some(Literal::Float(value))
}

/// Parse float literal text (`1.5`, `.5`, `1e3`, `1_000.5`).
pub fn parse_float(text: &str) -> Option<f64> {
    let valid = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-' | '_'));
    if !valid || !text.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let cleaned = if text.contains('_') {
        if !separators_between_digits(text, 10) {
            return None;
        }
        text.replace('_', "")
    } else {
        text.to_string()
    };
    cleaned.parse::<f64>().ok()
}

/// Recognize `true` / `false`, ASCII case-insensitively.
pub fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn split_radix(text: &str) -> (u32, &str) {
    let bytes = text.as_bytes();
    match bytes {
        [b'0', b'x' | b'X', ..] => (16, &text[2..]),
        [b'0', b'b' | b'B', ..] => (2, &text[2..]),
        [b'0', b'o' | b'O', ..] => (8, &text[2..]),
        [b'0', _, ..] => (8, &text[1..]),
        _ => (10, text),
    }
}

/// Validate digits for `radix` and drop `_` separators.
fn strip_separators(body: &str, radix: u32) -> Option<String> {
    if body.is_empty() || !separators_between_digits(body, radix) {
        return None;
    }
    let digits: String = body.chars().filter(|&c| c != '_').collect();
    digits.chars().all(|c| c.is_digit(radix)).then_some(digits)
}

/// Every `_` sits between two digits of `radix`.
fn separators_between_digits(text: &str, radix: u32) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.iter().enumerate().all(|(i, &c)| {
        c != '_'
            || (i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_digit(radix)
                && chars[i + 1].is_digit(radix))
    })
}
