//! HTTP handlers and route configuration.

mod accounts;
mod admin;
mod follow;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use yatube_core::access::Redirect;
use yatube_core::domain::{Group, Post, User};
use yatube_core::ports::PostScope;
use yatube_core::{Page, Paginator};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::PostCard;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/create/", web::get().to(posts::post_create_form))
        .route("/create/", web::post().to(posts::post_create))
        .service(
            web::scope("/posts/{post_id}")
                .route("/", web::get().to(posts::post_detail))
                .route("/edit/", web::get().to(posts::post_edit_form))
                .route("/edit/", web::post().to(posts::post_edit))
                .route("/comment/", web::post().to(posts::add_comment)),
        )
        .route("/follow/", web::get().to(follow::follow_index))
        .service(
            web::scope("/profile/{username}")
                .route("/", web::get().to(posts::profile))
                .route("/follow/", web::post().to(follow::profile_follow))
                .route("/unfollow/", web::post().to(follow::profile_unfollow)),
        )
        .service(
            web::scope("/auth")
                .route("/signup/", web::get().to(accounts::signup_form))
                .route("/signup/", web::post().to(accounts::signup))
                .route("/login/", web::get().to(accounts::login_form))
                .route("/login/", web::post().to(accounts::login))
                .route("/logout/", web::post().to(accounts::logout)),
        )
        .route("/health/", web::get().to(health::health_check))
        .route("/admin/cache/clear/", web::post().to(admin::clear_cache))
        .default_service(web::to(not_found));
}

async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound(
        "The requested page does not exist.".to_string(),
    ))
}

/// Login page address that returns to `next` afterwards.
pub fn login_location(next: &str) -> String {
    format!("/auth/login/?next={}", urlencoding::encode(next))
}

/// 302 to wherever an access decision or finished action points.
pub fn redirect(target: &Redirect) -> HttpResponse {
    let location = match target {
        Redirect::Login { next } => login_location(next),
        other => other.path(),
    };

    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Resolve one page of a post listing and load what its cards display.
async fn post_page(
    state: &AppState,
    scope: PostScope,
    requested: Option<&str>,
) -> AppResult<Page<PostCard>> {
    let count = state.posts.count(scope).await?;
    let window = Paginator::new(count as usize, state.posts_per_page).window(requested);
    let posts = state
        .posts
        .list(scope, window.offset() as u64, window.limit() as u64)
        .await?;

    let cards = post_cards(state, &posts).await?;
    Ok(Page::from_window(cards, window))
}

/// Build cards for `posts`, fetching authors and groups in one batch each.
async fn post_cards(state: &AppState, posts: &[Post]) -> AppResult<Vec<PostCard>> {
    let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let mut group_ids: Vec<Uuid> = posts.iter().filter_map(|p| p.group_id).collect();
    group_ids.sort_unstable();
    group_ids.dedup();

    let authors: HashMap<Uuid, User> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let groups: HashMap<Uuid, Group> = state
        .groups
        .find_by_ids(&group_ids)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();

    Ok(posts
        .iter()
        .map(|post| {
            PostCard::new(
                post,
                authors.get(&post.author_id),
                post.group_id.and_then(|id| groups.get(&id)),
            )
        })
        .collect())
}
