//! # Yatube Shared
//!
//! Wire types shared between the web server and its clients: submitted form
//! payloads, query strings and JSON response bodies.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, HealthResponse};
