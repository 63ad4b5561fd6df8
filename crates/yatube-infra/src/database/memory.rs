//! In-memory repositories - used when `DATABASE_URL` is not set and in tests.
//!
//! The store applies the same integrity rules as the SQL schema: unique
//! usernames, slugs and follow pairs, foreign keys, cascading deletes and the
//! no-self-follow check.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Comment, Follow, Group, Identifiable, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostRepository,
    PostScope, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    groups: Vec<Group>,
    /// Insertion order; listings sort on top of it.
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
}

impl Tables {
    fn has_user(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn has_group(&self, id: Uuid) -> bool {
        self.groups.iter().any(|g| g.id == id)
    }

    fn has_post(&self, id: Uuid) -> bool {
        self.posts.iter().any(|p| p.id == id)
    }

    fn in_scope(&self, post: &Post, scope: PostScope) -> bool {
        match scope {
            PostScope::All => true,
            PostScope::Group(group_id) => post.group_id == Some(group_id),
            PostScope::Author(author_id) => post.author_id == author_id,
            PostScope::FollowedBy(user_id) => self
                .follows
                .iter()
                .any(|f| f.user_id == user_id && f.author_id == post.author_id),
        }
    }

    /// Posts in scope, newest first. Equal timestamps keep the later insert first.
    fn scoped_posts(&self, scope: PostScope) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .rev()
            .filter(|p| self.in_scope(p, scope))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

fn upsert<T: Identifiable>(rows: &mut Vec<T>, entity: T) {
    match rows.iter_mut().find(|row| row.id() == entity.id()) {
        Some(row) => *row = entity,
        None => rows.push(entity),
    }
}

fn remove<T: Identifiable>(rows: &mut Vec<T>, id: Uuid) -> Result<(), RepoError> {
    let before = rows.len();
    rows.retain(|row| row.id() != id);
    if rows.len() == before {
        Err(RepoError::NotFound)
    } else {
        Ok(())
    }
}

fn find<T: Identifiable + Clone>(rows: &[T], id: Uuid) -> Option<T> {
    rows.iter().find(|row| row.id() == id).cloned()
}

/// All repositories over one set of in-process tables.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(find(&self.tables.read().await.users, id))
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint(format!(
                "username {} already exists",
                user.username
            )));
        }

        upsert(&mut tables.users, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        remove(&mut tables.users, id)?;

        let authored: HashSet<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|p| p.author_id != id);
        tables
            .comments
            .retain(|c| c.author_id != id && !authored.contains(&c.post_id));
        tables
            .follows
            .retain(|f| f.user_id != id && f.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(find(&self.tables.read().await.groups, id))
    }

    async fn save(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .groups
            .iter()
            .any(|g| g.slug == group.slug && g.id != group.id)
        {
            return Err(RepoError::Constraint(format!(
                "slug {} already exists",
                group.slug
            )));
        }

        upsert(&mut tables.groups, group.clone());
        Ok(group)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        remove(&mut tables.groups, id)?;
        for post in tables.posts.iter_mut().filter(|p| p.group_id == Some(id)) {
            post.group_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .groups
            .iter()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups = self.tables.read().await.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(find(&self.tables.read().await.posts, id))
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.has_user(post.author_id) {
            return Err(RepoError::Constraint("posts.author_id".to_string()));
        }
        if post.group_id.is_some_and(|g| !tables.has_group(g)) {
            return Err(RepoError::Constraint("posts.group_id".to_string()));
        }

        upsert(&mut tables.posts, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        remove(&mut tables.posts, id)?;
        tables.comments.retain(|c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn count(&self, scope: PostScope) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.scoped_posts(scope).len() as u64)
    }

    async fn list(&self, scope: PostScope, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .scoped_posts(scope)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(find(&self.tables.read().await.comments, id))
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.has_post(comment.post_id) {
            return Err(RepoError::Constraint("comments.post_id".to_string()));
        }
        if !tables.has_user(comment.author_id) {
            return Err(RepoError::Constraint("comments.author_id".to_string()));
        }

        upsert(&mut tables.comments, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        remove(&mut self.tables.write().await.comments, id)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .rev()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl BaseRepository<Follow, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Follow>, RepoError> {
        Ok(find(&self.tables.read().await.follows, id))
    }

    async fn save(&self, follow: Follow) -> Result<Follow, RepoError> {
        let mut tables = self.tables.write().await;
        if follow.user_id == follow.author_id {
            return Err(RepoError::Constraint("follows: self follow".to_string()));
        }
        if !tables.has_user(follow.user_id) || !tables.has_user(follow.author_id) {
            return Err(RepoError::Constraint("follows: unknown user".to_string()));
        }
        if tables.follows.iter().any(|f| {
            f.user_id == follow.user_id && f.author_id == follow.author_id && f.id != follow.id
        }) {
            return Err(RepoError::Constraint("follows: duplicate edge".to_string()));
        }

        upsert(&mut tables.follows, follow.clone());
        Ok(follow)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        remove(&mut self.tables.write().await.follows, id)
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn find_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<Option<Follow>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .find(|f| f.user_id == user_id && f.author_id == author_id)
            .cloned())
    }

    async fn get_or_create(&self, follow: Follow) -> Result<(Follow, bool), RepoError> {
        // A concurrent insert of the same pair surfaces as Constraint from `save`;
        // that edge is then fetched and returned as existing.
        {
            let tables = self.tables.read().await;
            if let Some(existing) = tables
                .follows
                .iter()
                .find(|f| f.user_id == follow.user_id && f.author_id == follow.author_id)
            {
                return Ok((existing.clone(), false));
            }
        }

        match BaseRepository::<Follow, Uuid>::save(self, follow.clone()).await {
            Ok(created) => Ok((created, true)),
            Err(RepoError::Constraint(_)) => self
                .find_edge(follow.user_id, follow.author_id)
                .await?
                .map(|existing| (existing, false))
                .ok_or_else(|| RepoError::Constraint("follows: invalid edge".to_string())),
            Err(e) => Err(e),
        }
    }

    async fn count_following(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.follows.iter().filter(|f| f.user_id == user_id).count() as u64)
    }

    async fn count_followers(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.follows.iter().filter(|f| f.author_id == author_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yatube_core::validation::PostInput;

    async fn user(store: &InMemoryStore, name: &str) -> User {
        BaseRepository::<User, Uuid>::save(store, User::new(name.into(), "hash".into()))
            .await
            .unwrap()
    }

    async fn post(store: &InMemoryStore, author: &User, group: Option<&Group>, text: &str) -> Post {
        let input = PostInput {
            text: text.into(),
            group_id: group.map(|g| g.id),
            image: None,
        };
        BaseRepository::<Post, Uuid>::save(store, Post::new(author.id, input))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let store = InMemoryStore::new();
        user(&store, "leo").await;

        let duplicate =
            BaseRepository::<User, Uuid>::save(&store, User::new("leo".into(), "x".into())).await;
        assert!(matches!(duplicate, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_listing_is_newest_first_and_scoped() {
        let store = InMemoryStore::new();
        let leo = user(&store, "leo").await;
        let ann = user(&store, "ann").await;
        let cats = BaseRepository::<Group, Uuid>::save(&store, Group::new("Cats", "cats", ""))
            .await
            .unwrap();

        let first = post(&store, &leo, Some(&cats), "first").await;
        let second = post(&store, &ann, None, "second").await;
        let third = post(&store, &leo, None, "third").await;

        let all = store.list(PostScope::All, 0, 10).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let in_group = store.list(PostScope::Group(cats.id), 0, 10).await.unwrap();
        assert_eq!(in_group, vec![first.clone()]);

        assert_eq!(store.count(PostScope::Author(leo.id)).await.unwrap(), 2);
        assert_eq!(store.list(PostScope::All, 1, 1).await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn test_followed_scope_only_shows_followed_authors() {
        let store = InMemoryStore::new();
        let reader = user(&store, "reader").await;
        let followed = user(&store, "followed").await;
        let other = user(&store, "other").await;
        let wanted = post(&store, &followed, None, "wanted").await;
        post(&store, &other, None, "unwanted").await;

        assert_eq!(store.count(PostScope::FollowedBy(reader.id)).await.unwrap(), 0);

        store
            .get_or_create(Follow::new(reader.id, followed.id).unwrap())
            .await
            .unwrap();
        let feed = store.list(PostScope::FollowedBy(reader.id), 0, 10).await.unwrap();
        assert_eq!(feed, vec![wanted]);
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = InMemoryStore::new();
        let a = user(&store, "a").await;
        let b = user(&store, "b").await;

        let (first, created) = store.get_or_create(Follow::new(a.id, b.id).unwrap()).await.unwrap();
        assert!(created);
        let (second, created) = store.get_or_create(Follow::new(a.id, b.id).unwrap()).await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(store.count_following(a.id).await.unwrap(), 1);
        assert_eq!(store.count_followers(b.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_deletes_cascade() {
        let store = InMemoryStore::new();
        let leo = user(&store, "leo").await;
        let ann = user(&store, "ann").await;
        let cats = BaseRepository::<Group, Uuid>::save(&store, Group::new("Cats", "cats", ""))
            .await
            .unwrap();
        let p = post(&store, &leo, Some(&cats), "text").await;
        BaseRepository::<Comment, Uuid>::save(&store, Comment::new(p.id, ann.id, "hi".into()))
            .await
            .unwrap();

        BaseRepository::<Group, Uuid>::delete(&store, cats.id).await.unwrap();
        let orphan = BaseRepository::<Post, Uuid>::find_by_id(&store, p.id).await.unwrap().unwrap();
        assert_eq!(orphan.group_id, None);

        BaseRepository::<User, Uuid>::delete(&store, leo.id).await.unwrap();
        assert_eq!(store.count(PostScope::All).await.unwrap(), 0);
        assert!(store.list_for_post(p.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_needs_existing_post() {
        let store = InMemoryStore::new();
        let leo = user(&store, "leo").await;

        let result = BaseRepository::<Comment, Uuid>::save(
            &store,
            Comment::new(Uuid::new_v4(), leo.id, "hi".into()),
        )
        .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}
