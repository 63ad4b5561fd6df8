//! Middleware modules: the login gate and error mapping.

pub mod auth;
pub mod error;
