//! HTTP middleware: request validation and security response headers.

pub mod security_headers;
pub mod validation;
