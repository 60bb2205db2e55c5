pub(crate) mod auth;
pub(crate) mod documents;
pub(crate) mod reminders;
pub(crate) mod smoke;
pub(crate) mod system;
