//! Data Transfer Objects - submitted forms and query strings.
//!
//! Every field is optional: a missing field is a validation error decided by
//! `yatube-core`, never a deserialization failure.

use serde::{Deserialize, Serialize};

/// `?page=` on listing pages. Kept as raw text; the paginator decides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Post create/edit form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    pub text: Option<String>,
    /// Selected group id, empty for "no group".
    pub group: Option<String>,
    /// Path of an already stored image, e.g. `posts/cat.gif`.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupForm {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Where to go after a successful login.
    pub next: Option<String>,
}

/// `?next=` on the login page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}
