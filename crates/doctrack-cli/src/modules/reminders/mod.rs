mod actions;
pub(crate) mod http;

pub(crate) use actions::handle_remind;
