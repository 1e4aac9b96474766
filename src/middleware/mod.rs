pub mod ip;
pub mod security_headers;
