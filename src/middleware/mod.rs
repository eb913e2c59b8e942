//! Router middleware.

pub mod request_id;
