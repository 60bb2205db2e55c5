pub mod email;
pub mod http;
pub mod scheduler;
pub mod service;
