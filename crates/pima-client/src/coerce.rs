//! Text → number coercion with the same results as the browser's `Number(text)`.
//!
//! Blank text is 0, surrounding whitespace is ignored, decimal literals with an
//! optional exponent, `Infinity` and `0x`/`0o`/`0b` integers are accepted, and
//! everything else is NaN.

/// WhiteSpace and LineTerminator as `Number()` trims them: the Zs category,
/// TAB, VT, FF, LF, CR, LS, PS and the byte-order mark. NEL is not included.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' ' | '\u{A0}' | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}

pub fn coerce_number(text: &str) -> f64 {
    let s = text.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity"              => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_prefixed_integer(s) {
        return value;
    }

    if is_decimal_literal(s) {
        s.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// `0x1F`, `0o17`, `0b101`. Signs are not allowed with a prefix.
fn parse_prefixed_integer(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    }).or(Some(f64::NAN))
}

/// `[+-]digits[.digits][(e|E)[+-]digits]` with at least one mantissa digit.
/// Rust's float parser also takes `inf` and `nan`, which `Number()` does not.
fn is_decimal_literal(s: &str) -> bool {
    let mut chars = s.chars().peekable();
    if matches!(chars.peek(), Some('+') | Some('-')) {
        chars.next();
    }

    let mut mantissa_digits = 0;
    while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
        chars.next();
        mantissa_digits += 1;
    }
    if chars.peek() == Some(&'.') {
        chars.next();
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            chars.next();
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }

    if matches!(chars.peek(), Some('e') | Some('E')) {
        chars.next();
        if matches!(chars.peek(), Some('+') | Some('-')) {
            chars.next();
        }
        let mut exponent_digits = 0;
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            chars.next();
            exponent_digits += 1;
        }
        if exponent_digits == 0 {
            return false;
        }
    }

    chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(coerce_number("12"), 12.0);
        assert_eq!(coerce_number(" 33.6 "), 33.6);
        assert_eq!(coerce_number("+7"), 7.0);
        assert_eq!(coerce_number("-0.25"), -0.25);
        assert_eq!(coerce_number(".5"), 0.5);
        assert_eq!(coerce_number("5."), 5.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
        assert_eq!(coerce_number("2.5E-1"), 0.25);
    }

    #[test]
    fn test_blank_is_zero() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number(" \t\n"), 0.0);
    }

    #[test]
    fn test_whitespace_set_matches_number() {
        assert_eq!(coerce_number("\u{A0}12\u{3000}"), 12.0);
        assert_eq!(coerce_number("\u{FEFF}\u{2028}7\u{0B}"), 7.0);
        assert!(coerce_number("\u{0085}12").is_nan());
        assert!(coerce_number("12\u{200B}").is_nan());
    }

    #[test]
    fn test_non_numeric_is_nan() {
        for text in ["abc", "12px", "1,5", "-", ".", "1e", "e5", "inf", "NaN", "infinity", "1_000", "--1"] {
            assert!(coerce_number(text).is_nan(), "{text:?} should be NaN");
        }
    }

    #[test]
    fn test_infinity_literals() {
        assert_eq!(coerce_number("Infinity"), f64::INFINITY);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_prefixed_integers() {
        assert_eq!(coerce_number("0x1F"), 31.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("0b102").is_nan());
        assert!(coerce_number("-0x1F").is_nan());
    }
}
