//! Plain and TLS servers for the API

pub mod http;
pub mod https;
