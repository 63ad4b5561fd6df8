//! Subscriptions: the followed-authors feed and the follow toggle.

use actix_web::{HttpResponse, web};

use yatube_core::access::Redirect;
use yatube_core::domain::{Follow, User};
use yatube_core::error::DomainError;
use yatube_core::ports::PostScope;
use yatube_shared::dto::PageQuery;

use super::{post_page, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{FollowPage, PageNav, render};

/// GET /follow/ - posts by authors the caller follows.
pub async fn follow_index(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = post_page(
        &state,
        PostScope::FollowedBy(identity.user_id),
        query.page.as_deref(),
    )
    .await?;
    let nav = PageNav::from(&page);

    render(&FollowPage {
        posts: page.items,
        nav,
    })
}

async fn find_author(state: &AppState, username: &str) -> AppResult<User> {
    Ok(state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", username))?)
}

/// POST /profile/{username}/follow/ - idempotent; following yourself does nothing.
pub async fn profile_follow(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &path.into_inner()).await?;

    if author.id != identity.user_id {
        let follow = Follow::new(identity.user_id, author.id)?;
        let (_, created) = state.follows.get_or_create(follow).await?;
        tracing::info!(
            follower = %identity.username,
            author = %author.username,
            created,
            "Follow requested"
        );
    }

    Ok(redirect(&Redirect::Profile(author.username)))
}

/// POST /profile/{username}/unfollow/ - 404 when the caller does not follow them.
pub async fn profile_unfollow(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &path.into_inner()).await?;

    let edge = state
        .follows
        .find_edge(identity.user_id, author.id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found("follow", format!("{} -> {}", identity.username, author.username))
        })?;

    state.follows.delete(edge.id).await?;
    tracing::info!(follower = %identity.username, author = %author.username, "Unfollowed");

    Ok(redirect(&Redirect::Profile(author.username)))
}
