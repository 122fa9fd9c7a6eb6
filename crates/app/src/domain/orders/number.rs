//! Order Numbers

use std::fmt;

use jiff::Timestamp;
use rand::{Rng, seq::SliceRandom};

const PREFIX: &str = "ORD";
const SUFFIX_LENGTH: usize = 6;
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Customer-facing order reference, `ORD-YYYYMMDD-XXXXXX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate a number dated `now` (UTC) with a random suffix.
    pub fn generate<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LENGTH)
            .filter_map(|_| SUFFIX_ALPHABET.choose(rng).copied().map(char::from))
            .collect();

        Self(format!("{PREFIX}-{}-{suffix}", now.strftime("%Y%m%d")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
