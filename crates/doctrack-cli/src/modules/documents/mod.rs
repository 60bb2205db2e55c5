mod actions;
pub(crate) mod args;
mod format_table;
pub(crate) mod http;

pub(crate) use actions::handle_docs;
#[cfg(test)]
pub(crate) use actions::build_patch;
#[cfg(test)]
pub(crate) use format_table::format_documents_table;
pub(crate) use format_table::print_documents_table;
