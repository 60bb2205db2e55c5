pub mod mailer;
pub mod metrics;
