pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const OWNER: &str = "owner";
    pub const USER: &str = "user";

    /// Roles that receive expiry reminders and may trigger a manual check.
    pub const REMINDER_ROLES: [&str; 2] = [ADMIN, OWNER];
}

pub mod limits {
    pub const DOCUMENT_TYPE_MAX: usize = 100;
    pub const DOCUMENT_OWNER_MAX: usize = 100;
    pub const DOCUMENT_NUMBER_MAX: usize = 50;
    pub const USERNAME_MAX: usize = 50;
    pub const EMAIL_MAX: usize = 100;
    pub const ROLE_MAX: usize = 20;
}

pub const DEFAULT_REMINDER_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE_LIMIT: i64 = 1000;

#[must_use]
pub fn is_reminder_role(role: &str) -> bool {
    roles::REMINDER_ROLES.contains(&role)
}
