use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    NoDocuments,
    NoRecipients,
    Sent,
    PartiallySent,
    DeliveryFailed,
}

impl ReminderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoDocuments => "no_documents",
            Self::NoRecipients => "no_recipients",
            Self::Sent => "sent",
            Self::PartiallySent => "partially_sent",
            Self::DeliveryFailed => "delivery_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReminderOutcome {
    pub status: ReminderStatus,
    pub documents: usize,
    pub recipients: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl ReminderOutcome {
    #[must_use]
    pub fn skipped(status: ReminderStatus, documents: usize) -> Self {
        Self {
            status,
            documents,
            recipients: 0,
            delivered: 0,
            failed: 0,
        }
    }

    #[must_use]
    pub fn delivery(documents: usize, delivered: usize, failed: usize) -> Self {
        let status = match (delivered, failed) {
            (_, 0) => ReminderStatus::Sent,
            (0, _) => ReminderStatus::DeliveryFailed,
            _ => ReminderStatus::PartiallySent,
        };
        Self {
            status,
            documents,
            recipients: delivered + failed,
            delivered,
            failed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReminderCheckResponse {
    pub message: String,
    pub outcome: ReminderOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_status_reflects_failures() {
        assert_eq!(ReminderOutcome::delivery(3, 2, 0).status, ReminderStatus::Sent);
        assert_eq!(
            ReminderOutcome::delivery(3, 1, 1).status,
            ReminderStatus::PartiallySent
        );
        assert_eq!(
            ReminderOutcome::delivery(3, 0, 2).status,
            ReminderStatus::DeliveryFailed
        );
        assert_eq!(ReminderOutcome::delivery(3, 1, 1).recipients, 2);
    }

    #[test]
    fn status_serializes_snake_case() {
        let value = serde_json::to_value(ReminderStatus::NoRecipients).expect("json");
        assert_eq!(value, "no_recipients");
        assert_eq!(ReminderStatus::NoRecipients.as_str(), "no_recipients");
    }
}
