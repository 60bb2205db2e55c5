pub mod auth;
pub mod documents;
pub mod reminders;
pub mod system;
