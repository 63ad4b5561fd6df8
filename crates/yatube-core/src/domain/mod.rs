//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
mod post;
mod user;

use uuid::Uuid;

pub use comment::Comment;
pub use follow::Follow;
pub use group::Group;
pub use post::Post;
pub use user::{ROLE_ADMIN, ROLE_USER, User};

/// Entities addressed by a UUID primary key.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

macro_rules! identifiable {
    ($($ty:ty),* $(,)?) => {
        $(impl Identifiable for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })*
    };
}

identifiable!(User, Group, Post, Comment, Follow);
