mod actions;
pub(crate) mod http;
pub(crate) mod types;

pub(crate) use actions::handle_health;
pub(crate) use types::CommandContext;
