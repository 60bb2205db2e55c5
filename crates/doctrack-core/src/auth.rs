use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::is_reminder_role;

/// Caller identity recovered from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Principal {
    pub username: String,
    pub role: String,
}

impl Principal {
    #[must_use]
    pub fn can_trigger_reminders(&self) -> bool {
        is_reminder_role(&self.role)
    }
}
