use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which countdown the session timer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Work,
    Break,
}

/// A minutes input field, kept as the text the user typed.
///
/// Parsing happens on use, so the field can hold text that is not (yet) a
/// valid duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationField {
    raw: String,
}

impl DurationField {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn set(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn minutes(&self) -> Result<u64, ValidationError> {
        parse_minutes(&self.raw)
    }

    /// Field value in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn seconds(&self) -> Result<u64, ValidationError> {
        Ok(self.minutes()?.saturating_mul(60))
    }
}

impl From<u64> for DurationField {
    fn from(minutes: u64) -> Self {
        Self::new(minutes.to_string())
    }
}

/// Parse whole minutes the way an integer form field does: skip leading
/// whitespace, then take the leading run of digits and ignore the rest.
///
/// `"25"`, `" 7"`, `"12abc"` and `"1.5"` give 25, 7, 12 and 1. Text without
/// leading digits (including a minus sign) is rejected.
pub fn parse_minutes(input: &str) -> Result<u64, ValidationError> {
    let digits: &str = {
        let trimmed = input.trim_start();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };

    if digits.is_empty() {
        return Err(ValidationError::InvalidDuration {
            input: input.to_string(),
        });
    }

    Ok(digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_integers() {
        assert_eq!(parse_minutes("25"), Ok(25));
        assert_eq!(parse_minutes("0"), Ok(0));
    }

    #[test]
    fn takes_leading_digits_only() {
        assert_eq!(parse_minutes("  7"), Ok(7));
        assert_eq!(parse_minutes("12abc"), Ok(12));
        assert_eq!(parse_minutes("1.5"), Ok(1));
    }

    #[test]
    fn rejects_text_without_leading_digits() {
        for bad in ["", "   ", "abc", "-5", "+5", ".5"] {
            assert!(parse_minutes(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(parse_minutes("99999999999999999999999"), Ok(u64::MAX));
        assert_eq!(DurationField::new("99999999999999999999999").seconds(), Ok(u64::MAX));
    }

    #[test]
    fn field_keeps_raw_text() {
        let mut field = DurationField::from(25);
        assert_eq!(field.seconds(), Ok(1500));
        field.set("abc");
        assert_eq!(field.raw(), "abc");
        assert!(field.minutes().is_err());
    }
}
