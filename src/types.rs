// =============================================================================
// Shared types used across the scanner
// =============================================================================

use serde::{Deserialize, Serialize};

/// How scan results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per potential buy: `AAPL: Potential BUY (3 out of 6 strategies)`.
    Text,
    /// One JSON object per evaluated ticker.
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected text or json)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(" text ".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn serde_is_lowercase() {
        let fmt: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(fmt, OutputFormat::Json);
        assert_eq!(serde_json::to_string(&OutputFormat::Text).unwrap(), "\"text\"");
    }
}
