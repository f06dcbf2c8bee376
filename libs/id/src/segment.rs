//! Escaped, check-digit-carrying UUID segments.
//!
//! Resource and value IDs are base64url UUIDs. In an ARK they carry a
//! trailing check digit, and `-` is written as `=` because ARK resolvers may
//! treat hyphens as insignificant.

use crate::check_digit;
use crate::error::{ArkError, ArkResult};

/// Character written in place of `-` inside ARK segments.
pub const ESCAPE: char = '=';

/// Appends a check digit to `uuid` and escapes the result for use in an ARK.
pub fn add_check_digit_and_escape(uuid: &str) -> ArkResult<String> {
    let digit = check_digit::calculate_check_digit(uuid)?;
    let mut checked = String::with_capacity(uuid.len() + 1);
    checked.push_str(uuid);
    checked.push(digit);
    Ok(checked.replace('-', "="))
}

/// Unescapes an ARK segment, validates its check digit, and returns the bare UUID.
///
/// `input` is the complete identifier and is only used for error reporting.
pub fn unescape_and_validate(input: &str, escaped: &str) -> ArkResult<String> {
    let unescaped = escaped.replace(ESCAPE, "-");
    match check_digit::strip_check_digit(&unescaped) {
        Ok(uuid) => Ok(uuid.to_string()),
        Err(_) => Err(ArkError::InvalidCheckDigit {
            input: input.to_string(),
        }),
    }
}
