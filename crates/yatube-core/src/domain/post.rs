use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::PostInput;

/// Number of characters shown when a post is referred to by its text.
const SUMMARY_CHARS: usize = 15;

/// Post entity - a text entry with one author and at most one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    /// Path of the attached image inside the media area, e.g. `posts/cat.gif`.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post authored by `author_id`.
    pub fn new(author_id: Uuid, input: PostInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            group_id: input.group_id,
            text: input.text,
            image: input.image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an edit in place. The image is only replaced when a new one is given.
    pub fn apply(&mut self, input: PostInput) {
        self.text = input.text;
        self.group_id = input.group_id;
        if input.image.is_some() {
            self.image = input.image;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Leading characters of the text, used as a page title.
    pub fn summary(&self) -> String {
        self.text.chars().take(SUMMARY_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str, image: Option<&str>) -> PostInput {
        PostInput {
            text: text.to_string(),
            group_id: None,
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn apply_keeps_existing_image_when_none_given() {
        let mut post = Post::new(Uuid::new_v4(), input("first", Some("posts/a.gif")));
        post.apply(input("second", None));

        assert_eq!(post.text, "second");
        assert_eq!(post.image.as_deref(), Some("posts/a.gif"));
    }

    #[test]
    fn summary_is_char_based() {
        let post = Post::new(Uuid::new_v4(), input("Привет, это длинный тестовый пост", None));
        assert_eq!(post.summary().chars().count(), SUMMARY_CHARS);
    }
}
