//! Check digits for base64url-encoded identifiers.
//!
//! A weighted modulus-64 scheme over the RFC 4648 base64url alphabet
//! (after Apache Commons `ModulusCheckDigit`). Each symbol contributes
//! `value * weight`, where the weight is the symbol's 1-based position
//! counted from the right of the complete (checked) code.

use crate::error::{ArkError, ArkResult};

/// The base64url alphabet (without padding), RFC 4648 Table 2.
/// A symbol's index is its value.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const MODULUS: u64 = 64;

/// Returns the value of `c` in [`ALPHABET`], if it is a member.
#[must_use]
pub const fn symbol_value(c: char) -> Option<u64> {
    let value = match c {
        'A'..='Z' => c as u64 - 'A' as u64,
        'a'..='z' => c as u64 - 'a' as u64 + 26,
        '0'..='9' => c as u64 - '0' as u64 + 52,
        '-' => 62,
        '_' => 63,
        _ => return None,
    };
    Some(value)
}

/// Returns the alphabet symbol for `value`, if `value < 64`.
#[must_use]
pub fn symbol(value: u64) -> Option<char> {
    usize::try_from(value)
        .ok()
        .and_then(|i| ALPHABET.get(i))
        .map(|&b| char::from(b))
}

/// Calculates the check digit for `code`, which must not already carry one.
///
/// Fails with [`ArkError::InvalidCharacter`] for symbols outside the alphabet
/// and with [`ArkError::DegenerateCode`] when the weighted sum is zero
/// (empty or all-`A` codes).
pub fn calculate_check_digit(code: &str) -> ArkResult<char> {
    let remainder = modulus(code, false)?;
    let value = (MODULUS - remainder) % MODULUS;
    symbol(value).ok_or_else(|| ArkError::DegenerateCode {
        code: code.to_string(),
    })
}

/// Returns true if `code` ends in a correct check digit.
///
/// Total over arbitrary input: empty strings, foreign symbols, and degenerate
/// codes all yield `false`.
#[must_use]
pub fn is_valid(code: &str) -> bool {
    !code.is_empty() && matches!(modulus(code, true), Ok(0))
}

/// Validates `code` and returns it without its trailing check digit.
pub fn strip_check_digit(code: &str) -> ArkResult<&str> {
    if !is_valid(code) {
        return Err(ArkError::InvalidCheckDigit {
            input: code.to_string(),
        });
    }
    // The last symbol is ASCII, so this is a char boundary.
    Ok(&code[..code.len() - 1])
}

fn modulus(code: &str, includes_check_digit: bool) -> ArkResult<u64> {
    let symbols = code.chars().count() as u64;
    let length = if includes_check_digit {
        symbols
    } else {
        symbols + 1
    };
    weighted_remainder(code, length)
}

/// Weighted sum of the symbols of `code` modulo 64, where the first symbol
/// has weight `length`. Reduced at every step, so the length of `code` is
/// unbounded.
fn weighted_remainder(code: &str, length: u64) -> ArkResult<u64> {
    let mut remainder = 0;
    let mut significant = false;
    for (i, c) in code.chars().enumerate() {
        let value = symbol_value(c).ok_or_else(|| ArkError::InvalidCharacter {
            character: c,
            code: code.to_string(),
        })?;
        let weight = (length - i as u64) % MODULUS;
        remainder = (remainder + value * weight) % MODULUS;
        significant |= value != 0;
    }

    // The unreduced sum is zero exactly when every symbol is `A`.
    if !significant {
        return Err(ArkError::DegenerateCode {
            code: code.to_string(),
        });
    }

    Ok(remainder)
}
