mod from_row;
mod structs;
mod validation;

pub use structs::{Document, DocumentPatch, NewDocument, NewUser, User};
pub use validation::ValidationError;
