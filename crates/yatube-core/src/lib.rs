//! # Yatube Core
//!
//! The domain layer of Yatube: users, groups, posts, comments and follow
//! edges, plus the rules that sit on top of them (paging, form validation,
//! access decisions).
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod access;
pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod validation;

pub use access::{Access, Redirect};
pub use error::{DomainError, RepoError};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageWindow, Paginator, page};
