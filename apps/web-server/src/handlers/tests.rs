use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use uuid::Uuid;

use yatube_core::domain::{Comment, Follow, Group, Post, User};
use yatube_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, PostRepository, PostScope,
    UserRepository,
};
use yatube_core::validation::PostInput;
use yatube_infra::{InMemoryCache, InMemoryStore, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::config::AppConfig;
use crate::seed::{GroupSeed, seed_groups};
use crate::state::AppState;

struct Fixture {
    store: Arc<InMemoryStore>,
    state: AppState,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        ..JwtConfig::default()
    }));
    let state = AppState::in_memory(
        store.clone(),
        Arc::new(InMemoryCache::new()),
        tokens,
        &AppConfig::default(),
    );

    Fixture { store, state }
}

macro_rules! app {
    ($fx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($fx.state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

impl Fixture {
    async fn user(&self, username: &str) -> User {
        BaseRepository::<User, Uuid>::save(
            &*self.store,
            User::new(username.to_string(), "unused".to_string()),
        )
        .await
        .unwrap()
    }

    async fn group(&self, title: &str, slug: &str) -> Group {
        BaseRepository::<Group, Uuid>::save(&*self.store, Group::new(title, slug, "About it"))
            .await
            .unwrap()
    }

    async fn post(&self, author: &User, group: Option<&Group>, text: &str) -> Post {
        let input = PostInput {
            text: text.to_string(),
            group_id: group.map(|g| g.id),
            image: None,
        };
        BaseRepository::<Post, Uuid>::save(&*self.store, Post::new(author.id, input))
            .await
            .unwrap()
    }

    async fn find_post(&self, id: Uuid) -> Option<Post> {
        BaseRepository::<Post, Uuid>::find_by_id(&*self.store, id)
            .await
            .unwrap()
    }

    async fn post_count(&self) -> u64 {
        self.store.count(PostScope::All).await.unwrap()
    }

    async fn comment_count(&self, post_id: Uuid) -> usize {
        self.store.list_for_post(post_id).await.unwrap().len()
    }

    fn session(&self, user: &User) -> Cookie<'static> {
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username, user.roles())
            .unwrap();
        Cookie::new(self.state.session.cookie_name.clone(), token)
    }
}

async fn body_of(resp: ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

fn location(resp: &ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

/// Post cards on a listing page.
fn cards(body: &str) -> usize {
    body.matches("href=\"/posts/").count()
}

#[actix_web::test]
async fn test_index_lists_posts_newest_first() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    fx.post(&leo, None, "Older entry").await;
    fx.post(&leo, None, "Newer entry").await;
    let app = app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_of(resp).await;
    let newer = body.find("Newer entry").unwrap();
    let older = body.find("Older entry").unwrap();
    assert!(newer < older);
}

#[actix_web::test]
async fn test_thirteen_posts_paginate_as_ten_and_three() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let cats = fx.group("Cats", "cats").await;
    for i in 0..13 {
        fx.post(&leo, Some(&cats), &format!("Post number {i}")).await;
    }
    let app = app!(fx);

    for listing in ["/", "/group/cats/", "/profile/leo/"] {
        let first = test::TestRequest::get().uri(listing).to_request();
        assert_eq!(cards(&body_of(test::call_service(&app, first).await).await), 10);

        let second = test::TestRequest::get()
            .uri(&format!("{listing}?page=2"))
            .to_request();
        assert_eq!(cards(&body_of(test::call_service(&app, second).await).await), 3);
    }
}

#[actix_web::test]
async fn test_page_past_the_end_clamps_to_last_page() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    for i in 0..13 {
        fx.post(&leo, None, &format!("Post number {i}")).await;
    }
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/?page=99").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_of(resp).await;
    assert_eq!(cards(&body), 3);
    assert!(body.contains("Page 2 of 2"));

    let req = test::TestRequest::get().uri("/?page=abc").to_request();
    let body = body_of(test::call_service(&app, req).await).await;
    assert!(body.contains("Page 1 of 2"));
}

#[actix_web::test]
async fn test_group_page_shows_only_its_posts() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let cats = fx.group("Cats", "cats").await;
    let dogs = fx.group("Dogs", "dogs").await;
    fx.post(&leo, Some(&cats), "Meow post").await;
    fx.post(&leo, Some(&dogs), "Woof post").await;
    fx.post(&leo, None, "Loose post").await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/group/cats/").to_request();
    let body = body_of(test::call_service(&app, req).await).await;
    assert!(body.contains("Meow post"));
    assert!(!body.contains("Woof post"));
    assert!(!body.contains("Loose post"));

    let req = test::TestRequest::get().uri("/group/birds/").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_seeded_group_is_served() {
    let fx = fixture();
    let seeds = vec![GroupSeed {
        title: "Cats".to_string(),
        slug: "cats".to_string(),
        description: "All about cats".to_string(),
    }];
    assert_eq!(seed_groups(fx.state.groups.as_ref(), seeds).await.unwrap(), 1);
    let app = app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/group/cats/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_of(resp).await.contains("All about cats"));
}

#[actix_web::test]
async fn test_unknown_profile_and_post_are_not_found() {
    let fx = fixture();
    let app = app!(fx);

    for uri in [
        "/profile/nobody/".to_string(),
        format!("/posts/{}/", Uuid::new_v4()),
        "/posts/not-a-uuid/".to_string(),
        "/no/such/page/".to_string(),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND,
            "{uri}"
        );
    }
}

#[actix_web::test]
async fn test_post_detail_shows_comments() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let ann = fx.user("ann").await;
    let post = fx.post(&leo, None, "Look at this").await;
    BaseRepository::<Comment, Uuid>::save(
        &*fx.store,
        Comment::new(post.id, ann.id, "Nice one".to_string()),
    )
    .await
    .unwrap();
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_of(resp).await;
    assert!(body.contains("Look at this"));
    assert!(body.contains("Nice one"));
    // Anonymous visitors get no comment form.
    assert!(!body.contains("name=\"text\""));
}

#[actix_web::test]
async fn test_protected_pages_redirect_anonymous_to_login() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let post = fx.post(&leo, None, "Mine").await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/create/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Fcreate%2F");

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        format!("/auth/login/?next=%2Fposts%2F{}%2Fedit%2F", post.id)
    );

    let req = test::TestRequest::get().uri("/follow/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(location(&resp).starts_with("/auth/login/"));
}

#[actix_web::test]
async fn test_create_post_persists_with_caller_as_author() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let cats = fx.group("Cats", "cats").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.session(&leo))
        .set_form([
            ("text", "Brand new post".to_string()),
            ("group", cats.id.to_string()),
            ("image", String::new()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo/");

    assert_eq!(fx.post_count().await, 1);
    let created = fx.store.list(PostScope::All, 0, 1).await.unwrap().remove(0);
    assert_eq!(created.author_id, leo.id);
    assert_eq!(created.group_id, Some(cats.id));

    let req = test::TestRequest::get().uri("/").to_request();
    let body = body_of(test::call_service(&app, req).await).await;
    assert!(body.contains("Brand new post"));
}

#[actix_web::test]
async fn test_create_invalid_post_renders_blank_form() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.session(&leo))
        .set_form([("text", ""), ("group", "not-a-group")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_of(resp).await;
    assert!(body.contains("This field is required."));
    assert!(body.contains("Select a valid choice."));
    assert_eq!(fx.post_count().await, 0);
}

#[actix_web::test]
async fn test_create_without_body_renders_blank_form() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.session(&leo))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_of(resp).await;
    assert!(body.contains("name=\"text\""));
    assert!(!body.contains("This field is required."));
    assert_eq!(fx.post_count().await, 0);
}

#[actix_web::test]
async fn test_edit_by_stranger_changes_nothing() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let ann = fx.user("ann").await;
    let post = fx.post(&leo, None, "Original text").await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.session(&ann))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.session(&ann))
        .set_form([("text", "Hijacked")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let stored = fx.find_post(post.id).await.unwrap();
    assert_eq!(stored.text, "Original text");
    assert_eq!(stored.group_id, None);
}

#[actix_web::test]
async fn test_author_edits_post_in_place() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let cats = fx.group("Cats", "cats").await;
    let post = fx.post(&leo, None, "Draft").await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.session(&leo))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_of(resp).await.contains("Draft"));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.session(&leo))
        .set_form([
            ("text", "Final".to_string()),
            ("group", cats.id.to_string()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let stored = fx.find_post(post.id).await.unwrap();
    assert_eq!(stored.id, post.id);
    assert_eq!(stored.text, "Final");
    assert_eq!(stored.group_id, Some(cats.id));
    assert_eq!(fx.post_count().await, 1);
}

#[actix_web::test]
async fn test_invalid_edit_rerenders_submitted_values() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let post = fx.post(&leo, None, "Keep me").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.session(&leo))
        .set_form([("text", "Changed text"), ("group", "bogus")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_of(resp).await;
    assert!(body.contains("Changed text"));
    assert!(body.contains("Select a valid choice."));
    assert_eq!(fx.find_post(post.id).await.unwrap().text, "Keep me");
}

#[actix_web::test]
async fn test_comments_need_a_session() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let post = fx.post(&leo, None, "Discuss").await;
    let app = app!(fx);
    let uri = format!("/posts/{}/comment/", post.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .cookie(fx.session(&leo))
        .set_form([("text", "First!")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    assert_eq!(fx.comment_count(post.id).await, 1);

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_form([("text", "Anonymous")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(location(&resp).starts_with("/auth/login/"));
    assert_eq!(fx.comment_count(post.id).await, 1);
}

#[actix_web::test]
async fn test_invalid_comment_is_dropped_but_redirects() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let post = fx.post(&leo, None, "Discuss").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .cookie(fx.session(&leo))
        .set_form([("text", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    assert_eq!(fx.comment_count(post.id).await, 0);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", Uuid::new_v4()))
        .cookie(fx.session(&leo))
        .set_form([("text", "Lost")])
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_comment_without_body_still_redirects() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let post = fx.post(&leo, None, "Discuss").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .cookie(fx.session(&leo))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    assert_eq!(fx.comment_count(post.id).await, 0);
}

#[actix_web::test]
async fn test_following_twice_creates_one_edge() {
    let fx = fixture();
    let reader = fx.user("reader").await;
    let writer = fx.user("writer").await;
    let app = app!(fx);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/profile/writer/follow/")
            .cookie(fx.session(&reader))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/profile/writer/");
    }

    assert_eq!(fx.store.count_following(reader.id).await.unwrap(), 1);
    assert!(fx.store.find_edge(reader.id, writer.id).await.unwrap().is_some());
}

#[actix_web::test]
async fn test_self_follow_is_a_no_op() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/profile/leo/follow/")
        .cookie(fx.session(&leo))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo/");
    assert_eq!(fx.store.count_following(leo.id).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_unfollow() {
    let fx = fixture();
    let reader = fx.user("reader").await;
    let writer = fx.user("writer").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/profile/writer/unfollow/")
        .cookie(fx.session(&reader))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(fx.store.count_following(reader.id).await.unwrap(), 0);

    fx.store
        .get_or_create(Follow::new(reader.id, writer.id).unwrap())
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/profile/writer/unfollow/")
        .cookie(fx.session(&reader))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/writer/");
    assert_eq!(fx.store.count_following(reader.id).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_feed_shows_only_followed_authors() {
    let fx = fixture();
    let reader = fx.user("reader").await;
    let followed = fx.user("followed").await;
    let stranger = fx.user("stranger").await;
    fx.post(&followed, None, "From a favourite").await;
    fx.post(&stranger, None, "From a stranger").await;
    fx.store
        .get_or_create(Follow::new(reader.id, followed.id).unwrap())
        .await
        .unwrap();
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/follow/")
        .cookie(fx.session(&reader))
        .to_request();
    let body = body_of(test::call_service(&app, req).await).await;
    assert!(body.contains("From a favourite"));
    assert!(!body.contains("From a stranger"));

    // Someone following nobody sees an empty feed.
    let req = test::TestRequest::get()
        .uri("/follow/")
        .cookie(fx.session(&stranger))
        .to_request();
    assert_eq!(cards(&body_of(test::call_service(&app, req).await).await), 0);
}

#[actix_web::test]
async fn test_profile_offers_follow_toggle_to_other_users() {
    let fx = fixture();
    let reader = fx.user("reader").await;
    fx.user("writer").await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/profile/writer/")
        .cookie(fx.session(&reader))
        .to_request();
    let body = body_of(test::call_service(&app, req).await).await;
    assert!(body.contains("/profile/writer/follow/"));

    let req = test::TestRequest::get().uri("/profile/writer/").to_request();
    let body = body_of(test::call_service(&app, req).await).await;
    assert!(!body.contains("/profile/writer/follow/"));
}

#[actix_web::test]
async fn test_cached_index_survives_delete_until_flushed() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let post = fx.post(&leo, None, "Soon gone").await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/").to_request();
    assert!(body_of(test::call_service(&app, req).await).await.contains("Soon gone"));

    BaseRepository::<Post, Uuid>::delete(&*fx.store, post.id).await.unwrap();

    let req = test::TestRequest::get().uri("/").to_request();
    assert!(body_of(test::call_service(&app, req).await).await.contains("Soon gone"));

    fx.state.page_cache.flush().await.unwrap();

    let req = test::TestRequest::get().uri("/").to_request();
    assert!(!body_of(test::call_service(&app, req).await).await.contains("Soon gone"));
}

#[actix_web::test]
async fn test_cache_clear_is_staff_only() {
    let fx = fixture();
    let leo = fx.user("leo").await;
    let mut admin = User::new("admin".to_string(), "unused".to_string());
    admin.is_staff = true;
    let admin = BaseRepository::<User, Uuid>::save(&*fx.store, admin)
        .await
        .unwrap();
    fx.post(&leo, None, "Cached text").await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/").to_request();
    test::call_service(&app, req).await;
    assert!(fx.state.page_cache.get("page:/").await.is_some());

    let req = test::TestRequest::post().uri("/admin/cache/clear/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);

    let req = test::TestRequest::post()
        .uri("/admin/cache/clear/")
        .cookie(fx.session(&leo))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    assert!(fx.state.page_cache.get("page:/").await.is_some());

    let req = test::TestRequest::post()
        .uri("/admin/cache/clear/")
        .cookie(fx.session(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(fx.state.page_cache.get("page:/").await.is_none());
}

#[actix_web::test]
async fn test_signup_then_login() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "newbie"),
            ("first_name", "New"),
            ("last_name", "Bie"),
            ("password", "long-enough-pw"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(resp.headers().contains_key(header::SET_COOKIE));

    let user = fx.store.find_by_username("newbie").await.unwrap().unwrap();
    assert_eq!(user.display_name(), "New Bie");

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([("username", "newbie"), ("password", "long-enough-pw")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_of(resp).await.contains("already exists"));

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "newbie"),
            ("password", "long-enough-pw"),
            ("next", "/follow/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/follow/");

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", "newbie"), ("password", "wrong-password")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_of(resp).await.contains("Please enter a correct username and password"));
}

#[actix_web::test]
async fn test_health_check() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/health/").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}
