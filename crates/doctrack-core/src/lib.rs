#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::similar_names)]

pub mod api;
pub mod auth;
pub mod constants;
pub mod expiry;
pub mod models;

pub use crate::auth::*;
pub use crate::constants::*;
pub use crate::expiry::*;
pub use crate::models::*;
