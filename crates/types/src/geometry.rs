//! Lenient numeric parsing for normalized pairs, rects and scalars.
//!
//! Theme documents are hand written and frequently sloppy, so these parsers
//! never fail: unreadable components become `0.0`.

/// Reads the longest leading decimal number of `s`, like C's `atof`.
///
/// Always uses `.` as the decimal separator regardless of locale.
pub fn parse_float_prefix(s: &str) -> f32 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return 0.0;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f32>().unwrap_or(0.0)
}

/// Parses `"x y"`. The text is split at the first whitespace character; a
/// missing or malformed half reads as `0`, and a string without whitespace
/// yields `(0, 0)`.
pub fn parse_pair(s: &str) -> (f32, f32) {
    match s.split_once(char::is_whitespace) {
        Some((first, second)) => (parse_float_prefix(first), parse_float_prefix(second)),
        None => (0.0, 0.0),
    }
}

/// Parses one, two or four whitespace separated floats.
///
/// One value fills all four slots and two values are repeated as `x y x y`.
/// Any other count yields zeros.
pub fn parse_rect(s: &str) -> (f32, f32, f32, f32) {
    let parts: Vec<f32> = s.split_whitespace().map(parse_float_prefix).collect();
    match parts.as_slice() {
        [v] => (*v, *v, *v, *v),
        [a, b] => (*a, *b, *a, *b),
        [a, b, c, d] => (*a, *b, *c, *d),
        _ => (0.0, 0.0, 0.0, 0.0),
    }
}

/// `true` when the first character is one of `1tTyY`.
pub fn parse_bool(s: &str) -> bool {
    matches!(s.chars().next(), Some('1' | 't' | 'T' | 'y' | 'Y'))
}
