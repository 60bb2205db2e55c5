use crate::constants::limits;

use super::structs::{DocumentPatch, NewDocument, NewUser};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

fn check_max(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(field, "too_long"));
    }
    Ok(())
}

fn check_required(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "required"));
    }
    check_max(field, value, max)
}

impl NewDocument {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_max(
            "document_type",
            &self.document_type,
            limits::DOCUMENT_TYPE_MAX,
        )?;
        check_max(
            "document_owner",
            &self.document_owner,
            limits::DOCUMENT_OWNER_MAX,
        )?;
        check_max(
            "document_number",
            &self.document_number,
            limits::DOCUMENT_NUMBER_MAX,
        )
    }
}

impl DocumentPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(value) = self.document_type.as_deref() {
            check_max("document_type", value, limits::DOCUMENT_TYPE_MAX)?;
        }
        if let Some(value) = self.document_owner.as_deref() {
            check_max("document_owner", value, limits::DOCUMENT_OWNER_MAX)?;
        }
        if let Some(value) = self.document_number.as_deref() {
            check_max("document_number", value, limits::DOCUMENT_NUMBER_MAX)?;
        }
        Ok(())
    }
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_required("username", &self.username, limits::USERNAME_MAX)?;
        check_required("email", &self.email, limits::EMAIL_MAX)?;
        if !self.email.contains('@') {
            return Err(ValidationError::new("email", "invalid"));
        }
        check_required("role", &self.role, limits::ROLE_MAX)
    }
}
