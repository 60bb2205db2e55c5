pub mod auth;
pub mod documents;
pub mod errors;
pub mod reminders;
