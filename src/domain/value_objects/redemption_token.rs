use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by scannable ticket artifacts ahead of the token itself.
const SCAN_PAYLOAD_PREFIX: &str = "TICKET:";

/// The unique secret embedded in a ticket's scannable artifact.
///
/// Resolves to at most one cached ticket. Immutable for the lifetime of the
/// ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RedemptionToken(String);

impl RedemptionToken {
    pub fn new(value: String) -> Result<Self, String> {
        if value.trim().is_empty() {
            return Err("Redemption token cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Parses a raw decoded scan payload. Payloads produced by the ticket
    /// issuer are prefixed with `TICKET:`; bare tokens are accepted as-is so
    /// manual entry keeps working.
    pub fn from_scan_payload(payload: &str) -> Result<Self, String> {
        let trimmed = payload.trim();
        let token = trimmed.strip_prefix(SCAN_PAYLOAD_PREFIX).unwrap_or(trimmed);
        Self::new(token.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedemptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RedemptionToken> for String {
    fn from(token: RedemptionToken) -> Self {
        token.0
    }
}
