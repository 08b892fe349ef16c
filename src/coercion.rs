//! Tolerant parsing of amount and ID fields from loosely-typed JSON input.
//!
//! Clients send monetary amounts as either numbers or formatted strings
//! (`"$1,234.50"`), and account references as numbers, numeric strings, or
//! null. These functions form the validation boundary that turns such input
//! into well-typed values or rejects it.

use serde_json::Value;

use crate::{Error, database_id::DatabaseId};

/// Parse a monetary amount from a raw JSON value.
///
/// Textual input has thousands separators, common currency glyphs and
/// surrounding whitespace stripped before parsing. Numeric input is used
/// directly.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the cleaned text is not a number, or if
/// the value is of a type that cannot be converted to a number.
pub fn parse_amount(value: &Value) -> Result<f64, Error> {
    match value {
        Value::String(text) => {
            let cleaned = text.replace(',', "").replace(['$', '€', '£'], "");
            cleaned
                .trim()
                .parse()
                .map_err(|_| Error::InvalidAmount(text.clone()))
        }
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| Error::InvalidAmount(number.to_string())),
        other => Err(Error::InvalidAmount(other.to_string())),
    }
}

/// Parse an optional account reference from a raw JSON value.
///
/// `null` means "no reference" and is not an error. Textual input is parsed
/// as a base-10 integer. Numeric input that is not integral is truncated
/// toward zero.
///
/// # Errors
/// Returns [Error::InvalidReference] if the value is non-numeric text or of a
/// type that cannot be converted to an integer.
pub fn parse_account_reference(value: &Value) -> Result<Option<DatabaseId>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidReference(text.clone())),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as DatabaseId))
            .map(Some)
            .ok_or_else(|| Error::InvalidReference(number.to_string())),
        other => Err(Error::InvalidReference(other.to_string())),
    }
}
