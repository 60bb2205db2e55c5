mod actions;
pub(crate) mod args;
mod report;

pub(crate) use actions::handle_smoke;
#[cfg(test)]
pub(crate) use actions::{smoke_document, smoke_patch};
#[cfg(test)]
pub(crate) use report::{status_line, SmokeReport};
