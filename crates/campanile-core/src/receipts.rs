//! Structured request-log values attached to registrar actions.
//!
//! Every mutating registrar operation reports back what happened and on
//! whose behalf. `success = false` marks a no-op outcome (e.g. a status
//! update to the current status), which is distinct from a hard failure:
//! no-ops return 200 with the receipt, failures return an error status.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Outcome record for a registrar-level action.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActionReceipt {
    /// Whether the action changed anything.
    pub success: bool,
    /// When the action was processed.
    pub requested_at: DateTime<Utc>,
    /// Identity of the acting user, as forwarded by the gateway.
    pub requested_by: String,
    /// Human-readable description of what happened.
    pub description: String,
}

impl ActionReceipt {
    pub fn applied(requested_by: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            success: true,
            requested_at: Utc::now(),
            requested_by: requested_by.into(),
            description: description.into(),
        }
    }

    /// A request that was understood but changed nothing.
    pub fn noop(requested_by: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            success: false,
            requested_at: Utc::now(),
            requested_by: requested_by.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applied_receipt() {
        let receipt = ActionReceipt::applied("registrar-1", "Registered term.");
        assert!(receipt.success);
        assert_eq!(receipt.requested_by, "registrar-1");
    }

    #[test]
    fn test_noop_receipt() {
        let receipt = ActionReceipt::noop("registrar-1", "Term is already open.");
        assert!(!receipt.success);
    }
}
