use crate::domain::entities::TicketSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a scan was accepted or rejected. Every reason maps to a distinct
/// operator message; "already used" and "already used on this device" must
/// never be conflated at the gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ScanReason {
    Valid,
    AlreadyUsed { used_at: Option<DateTime<Utc>> },
    AlreadyUsedOffline,
    NotCached,
    NotFound,
}

impl ScanReason {
    pub fn message(&self) -> String {
        match self {
            ScanReason::Valid => "Ticket valid".to_string(),
            ScanReason::AlreadyUsed { used_at: Some(at) } => {
                format!("Ticket already used at {}", at.format("%Y-%m-%d %H:%M"))
            }
            ScanReason::AlreadyUsed { used_at: None } => "Ticket already used".to_string(),
            ScanReason::AlreadyUsedOffline => {
                "Ticket already used on this device (sync pending)".to_string()
            }
            ScanReason::NotCached => {
                "Ticket not in the offline cache for this device".to_string()
            }
            ScanReason::NotFound => "Ticket not found".to_string(),
        }
    }
}

/// Result of validating one scanned payload.
///
/// `offline` records which path produced the verdict: `false` means the
/// registry answered authoritatively, `true` means the decision came from the
/// local cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanOutcome {
    pub accepted: bool,
    pub reason: ScanReason,
    pub ticket: Option<TicketSummary>,
    pub offline: bool,
}

impl ScanOutcome {
    pub fn accepted(ticket: TicketSummary, offline: bool) -> Self {
        Self {
            accepted: true,
            reason: ScanReason::Valid,
            ticket: Some(ticket),
            offline,
        }
    }

    pub fn rejected(reason: ScanReason, offline: bool) -> Self {
        Self {
            accepted: false,
            reason,
            ticket: None,
            offline,
        }
    }

    pub fn rejected_with_ticket(reason: ScanReason, ticket: TicketSummary, offline: bool) -> Self {
        Self {
            accepted: false,
            reason,
            ticket: Some(ticket),
            offline,
        }
    }
}
