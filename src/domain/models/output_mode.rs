//! Output mode setting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the inference result is written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Result replaces the message payload
    #[default]
    Payload,
    /// Result is stored in a message header named by `outputName`
    Header,
}

impl OutputMode {
    /// Lowercase setting value
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Payload => "payload",
            Self::Header => "header",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("payload") {
            Ok(Self::Payload)
        } else if s.eq_ignore_ascii_case("header") {
            Ok(Self::Header)
        } else {
            Err(format!("expected one of: payload, header (got '{s}')"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("payload".parse::<OutputMode>(), Ok(OutputMode::Payload));
        assert_eq!("HEADER".parse::<OutputMode>(), Ok(OutputMode::Header));
        assert_eq!(" Header ".parse::<OutputMode>(), Ok(OutputMode::Header));
        assert!("headers".parse::<OutputMode>().is_err());
        assert!("".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_default_is_payload() {
        assert_eq!(OutputMode::default(), OutputMode::Payload);
    }
}
