//! Access decisions for mutating actions.
//!
//! A denied action is not an error: the actor is sent to a safe read-only
//! page instead. Handlers receive an [`Access`] and turn the denial into a
//! redirect themselves.

use uuid::Uuid;

use crate::domain::Post;

/// Where a denied (or finished) action sends the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Index,
    PostDetail(Uuid),
    Profile(String),
    Login { next: String },
}

impl Redirect {
    /// Path for the `Location` header. The login `next` value is returned raw;
    /// callers must query-encode it.
    pub fn path(&self) -> String {
        match self {
            Redirect::Index => "/".to_string(),
            Redirect::PostDetail(id) => format!("/posts/{id}/"),
            Redirect::Profile(username) => format!("/profile/{username}/"),
            Redirect::Login { .. } => "/auth/login/".to_string(),
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<T> {
    Authorized(T),
    DeniedRedirect(Redirect),
}

/// Only the author may edit a post; everyone else is sent back to the post.
pub fn authorize_post_edit(post: Post, user_id: Uuid) -> Access<Post> {
    if post.is_authored_by(user_id) {
        Access::Authorized(post)
    } else {
        Access::DeniedRedirect(Redirect::PostDetail(post.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::PostInput;

    fn post_by(author_id: Uuid) -> Post {
        Post::new(
            author_id,
            PostInput {
                text: "text".into(),
                group_id: None,
                image: None,
            },
        )
    }

    #[test]
    fn author_is_authorized() {
        let author = Uuid::new_v4();
        let post = post_by(author);
        assert_eq!(
            authorize_post_edit(post.clone(), author),
            Access::Authorized(post)
        );
    }

    #[test]
    fn stranger_is_sent_to_detail_page() {
        let post = post_by(Uuid::new_v4());
        let id = post.id;

        let access = authorize_post_edit(post, Uuid::new_v4());
        assert_eq!(access, Access::DeniedRedirect(Redirect::PostDetail(id)));
        assert_eq!(Redirect::PostDetail(id).path(), format!("/posts/{id}/"));
    }
}
