//! Numeric argument parsing
//!
//! Lenient mode mirrors C `atoi`/`atof`: parse the longest numeric prefix
//! and read anything else as 0. Strict mode demands the whole value be a
//! well-formed number.

use crate::config::NumberParsing;

/// A value that was not a well-formed number (strict mode only)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BadNumber;

/// Parse an integer argument
pub fn parse_int(value: &str, mode: NumberParsing) -> Result<i32, BadNumber> {
    match mode {
        NumberParsing::Lenient => Ok(lenient_int(value)),
        NumberParsing::Strict => value.parse::<i32>().map_err(|_| BadNumber),
    }
}

/// Parse an unsigned 32-bit argument
///
/// Strict mode accepts only plain `u32` values.
pub fn parse_uint(value: &str, mode: NumberParsing) -> Result<u32, BadNumber> {
    match mode {
        NumberParsing::Lenient => Ok(lenient_uint(value)),
        NumberParsing::Strict => value.parse::<u32>().map_err(|_| BadNumber),
    }
}

/// Parse a floating-point argument
pub fn parse_float(value: &str, mode: NumberParsing) -> Result<f32, BadNumber> {
    match mode {
        NumberParsing::Lenient => Ok(lenient_float(value)),
        NumberParsing::Strict => value
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(BadNumber),
    }
}

/// Parse a channel argument: a bare integer, or `A<n>`/`a<n>` resolved to
/// `analog_base + n`
pub fn parse_channel(value: &str, analog_base: u8, mode: NumberParsing) -> Result<i32, BadNumber> {
    match value.strip_prefix(['A', 'a']) {
        Some(offset) => Ok((analog_base as i32).saturating_add(parse_int(offset, mode)?)),
        None => parse_int(value, mode),
    }
}

/// Sign and digit-prefix magnitude, capped at `cap`
fn signed_prefix(value: &str, cap: i64) -> (bool, i64) {
    let bytes = value.trim_start().as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut magnitude: i64 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        magnitude = (magnitude * 10 + (b - b'0') as i64).min(cap);
    }
    (negative, magnitude)
}

/// `atoi`: optional whitespace and sign, then digits up to the first non-digit
///
/// Saturates at the `i32` bounds.
pub fn lenient_int(value: &str) -> i32 {
    let (negative, magnitude) = signed_prefix(value, i32::MAX as i64 + 1);
    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// `strtoul` on a 32-bit target: the digit prefix saturates at `u32::MAX`
/// and a leading `-` negates modulo 2^32
pub fn lenient_uint(value: &str) -> u32 {
    let (negative, magnitude) = signed_prefix(value, u32::MAX as i64 + 1);
    match u32::try_from(magnitude) {
        Ok(m) if negative => m.wrapping_neg(),
        Ok(m) => m,
        Err(_) => u32::MAX,
    }
}

/// `atof`: the longest `[+-]digits[.digits][e[+-]digits]` prefix, else 0
pub fn lenient_float(value: &str) -> f32 {
    let text = value.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse::<f32>().unwrap_or(0.0)
}
