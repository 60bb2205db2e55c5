use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    pub sno: i32,
    pub document_type: String,
    pub document_owner: String,
    pub document_number: String,
    pub expiry_date: NaiveDate,
    pub action_due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewDocument {
    pub document_type: String,
    pub document_owner: String,
    pub document_number: String,
    pub expiry_date: NaiveDate,
    pub action_due_date: NaiveDate,
}

/// Partial update; `None` (absent or `null`) leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_due_date: Option<NaiveDate>,
}

impl DocumentPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document_type.is_none()
            && self.document_owner.is_none()
            && self.document_number.is_none()
            && self.expiry_date.is_none()
            && self.action_due_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: String,
}
