use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::TickerError;

const MAX_TICKER_LEN: usize = 10;

/// Validated exchange ticker, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, TickerError> {
        let normalized = input.trim().to_ascii_uppercase();
        let mut chars = normalized.chars();
        let first = chars.next().ok_or(TickerError::Empty)?;

        let len = normalized.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(TickerError::TooLong {
                len,
                max: MAX_TICKER_LEN,
            });
        }
        if !first.is_ascii_alphabetic() {
            return Err(TickerError::InvalidStart { ch: first });
        }
        if let Some((index, ch)) = normalized
            .chars()
            .enumerate()
            .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || *ch == '.' || *ch == '-'))
        {
            return Err(TickerError::InvalidChar { ch, index });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = TickerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}
