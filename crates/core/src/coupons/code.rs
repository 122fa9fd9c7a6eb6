//! Coupon Codes

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted coupon code, in characters.
pub const MAX_CODE_LENGTH: usize = 50;

/// Errors raised when normalising a coupon code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponCodeError {
    /// Nothing left after trimming.
    #[error("coupon code is required")]
    Empty,

    /// More than [`MAX_CODE_LENGTH`] characters.
    #[error("coupon code must be at most {MAX_CODE_LENGTH} characters")]
    TooLong,

    /// Only ASCII letters, digits, `-` and `_` are allowed.
    #[error("coupon code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A normalised coupon code.
///
/// Codes are case-insensitive: `save10`, ` SAVE10 ` and `Save10` all parse to
/// `SAVE10`, which is the form stored and compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Trim, uppercase and check `raw`.
    ///
    /// # Errors
    ///
    /// Returns an error when the code is empty, too long or contains
    /// characters outside `A-Z`, `0-9`, `-` and `_`.
    pub fn parse(raw: &str) -> Result<Self, CouponCodeError> {
        let normalised = raw.trim().to_ascii_uppercase();

        if normalised.is_empty() {
            return Err(CouponCodeError::Empty);
        }

        if normalised.chars().count() > MAX_CODE_LENGTH {
            return Err(CouponCodeError::TooLong);
        }

        if let Some(invalid) = normalised
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(CouponCodeError::InvalidCharacter(invalid));
        }

        Ok(Self(normalised))
    }

    /// The normalised code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CouponCode {
    type Err = CouponCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_trims_and_uppercases() -> TestResult {
        let code = CouponCode::parse("  save10 ")?;

        assert_eq!(code.as_str(), "SAVE10");

        Ok(())
    }

    #[test]
    fn codes_differing_in_case_are_equal() -> TestResult {
        assert_eq!(CouponCode::parse("Flat50")?, CouponCode::parse("FLAT50")?);

        Ok(())
    }

    #[test]
    fn empty_code_is_rejected() {
        assert_eq!(CouponCode::parse("   "), Err(CouponCodeError::Empty));
    }

    #[test]
    fn overlong_code_is_rejected() {
        let raw = "A".repeat(MAX_CODE_LENGTH + 1);

        assert_eq!(CouponCode::parse(&raw), Err(CouponCodeError::TooLong));
    }

    #[test]
    fn punctuation_is_rejected() {
        assert_eq!(
            CouponCode::parse("SAVE 10"),
            Err(CouponCodeError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn owned_strings_go_through_normalisation() -> TestResult {
        let code = CouponCode::try_from("summer_sale".to_string())?;

        assert_eq!(String::from(code), "SUMMER_SALE");

        Ok(())
    }
}
