//! Post listings, detail page and the post/comment forms.

use actix_web::{HttpRequest, HttpResponse, web};
use askama::Template;
use uuid::Uuid;

use yatube_core::access::{Access, Redirect, authorize_post_edit};
use yatube_core::domain::{Comment, Post};
use yatube_core::error::DomainError;
use yatube_core::ports::PostScope;
use yatube_core::validation::{CommentInput, PostInput};
use yatube_shared::dto::{CommentForm, PageQuery, PostForm};

use super::{post_cards, post_page, redirect};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{
    CommentView, GroupPage, IndexPage, PageNav, PostCard, PostDetailPage, PostFormPage,
    ProfilePage, group_options, html, render,
};

/// GET / - every post, newest first. The rendered page is cached.
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let key = state.page_cache.key_for(req.path(), req.query_string());

    let body = state
        .page_cache
        .get_or_render(&key, || async {
            let page = post_page(&state, PostScope::All, query.page.as_deref()).await?;
            let nav = PageNav::from(&page);
            Ok::<_, AppError>(IndexPage {
                posts: page.items,
                nav,
            }
            .render()?)
        })
        .await?;

    Ok(html(body))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("group", &slug))?;

    let page = post_page(&state, PostScope::Group(group.id), query.page.as_deref()).await?;
    let nav = PageNav::from(&page);

    render(&GroupPage {
        title: group.title,
        description: group.description,
        posts: page.items,
        nav,
    })
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", &username))?;

    let page = post_page(&state, PostScope::Author(author.id), query.page.as_deref()).await?;
    let nav = PageNav::from(&page);

    let (can_follow, following) = match viewer.user_id() {
        Some(viewer_id) if viewer_id != author.id => (
            true,
            state.follows.find_edge(viewer_id, author.id).await?.is_some(),
        ),
        _ => (false, false),
    };

    render(&ProfilePage {
        name: author.display_name(),
        post_count: page.count(),
        follower_count: state.follows.count_followers(author.id).await?,
        following_count: state.follows.count_following(author.id).await?,
        username: author.username,
        can_follow,
        following,
        posts: page.items,
        nav,
    })
}

async fn find_post(state: &AppState, post_id: Uuid) -> AppResult<Post> {
    Ok(state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?)
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;

    let card = post_cards(&state, std::slice::from_ref(&post))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("post card missing".to_string()))?;

    let comments = state.comments.list_for_post(post.id).await?;
    let mut commenter_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
    commenter_ids.sort_unstable();
    commenter_ids.dedup();
    let commenters = state.users.find_by_ids(&commenter_ids).await?;

    let comments = comments
        .iter()
        .map(|comment| {
            CommentView::new(
                comment,
                commenters.iter().find(|u| u.id == comment.author_id),
            )
        })
        .collect();

    render(&PostDetailPage {
        author_post_count: state.posts.count(PostScope::Author(post.author_id)).await?,
        can_edit: viewer.user_id().is_some_and(|id| post.is_authored_by(id)),
        can_comment: viewer.0.is_some(),
        post: card,
        comments,
    })
}

/// GET /create/
pub async fn post_create_form(
    _identity: Identity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list_all().await?;
    render(&PostFormPage::new("/create/".to_string(), &groups))
}

/// POST /create/ - on success the author lands on their profile.
///
/// An invalid submission gets a blank form back together with the errors; a
/// request without a form body gets the blank form alone.
pub async fn post_create(
    identity: Identity,
    state: web::Data<AppState>,
    form: Option<web::Form<PostForm>>,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list_all().await?;
    let Some(form) = form.map(web::Form::into_inner) else {
        return render(&PostFormPage::new("/create/".to_string(), &groups));
    };

    match PostInput::validate(form.text, form.group, form.image, &groups) {
        Ok(input) => {
            let post = state.posts.save(Post::new(identity.user_id, input)).await?;
            tracing::info!(post_id = %post.id, username = %identity.username, "Post created");
            Ok(redirect(&Redirect::Profile(identity.username)))
        }
        Err(errors) => {
            let mut page = PostFormPage::new("/create/".to_string(), &groups);
            page.errors = errors.messages();
            render(&page)
        }
    }
}

/// GET /posts/{post_id}/edit/ - the author gets the pre-filled form.
pub async fn post_edit_form(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;

    match authorize_post_edit(post, identity.user_id) {
        Access::Authorized(post) => {
            let groups = state.groups.list_all().await?;
            render(&PostFormPage::editing(
                format!("/posts/{}/edit/", post.id),
                &post,
                &groups,
            ))
        }
        Access::DeniedRedirect(target) => Ok(redirect(&target)),
    }
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;

    let mut post = match authorize_post_edit(post, identity.user_id) {
        Access::Authorized(post) => post,
        Access::DeniedRedirect(target) => {
            tracing::debug!(username = %identity.username, "Edit of another author's post refused");
            return Ok(redirect(&target));
        }
    };

    let form = form.into_inner();
    let groups = state.groups.list_all().await?;
    let submitted_group = form.group.clone();
    let submitted_text = form.text.clone().unwrap_or_default();
    let submitted_image = form.image.clone().unwrap_or_default();

    match PostInput::validate(form.text, form.group, form.image, &groups) {
        Ok(input) => {
            post.apply(input);
            let post = state.posts.save(post).await?;
            tracing::info!(post_id = %post.id, "Post updated");
            Ok(redirect(&Redirect::PostDetail(post.id)))
        }
        Err(errors) => render(&PostFormPage {
            is_edit: true,
            action: format!("/posts/{}/edit/", post.id),
            text: submitted_text,
            image: submitted_image,
            groups: group_options(&groups, submitted_group.as_deref()),
            errors: errors.messages(),
        }),
    }
}

/// POST /posts/{post_id}/comment/ - always ends on the post page; an empty
/// or missing comment is dropped without a message.
pub async fn add_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: Option<web::Form<CommentForm>>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    let form = form.map(web::Form::into_inner).unwrap_or_default();

    match CommentInput::validate(form.text) {
        Ok(input) => {
            let comment = state
                .comments
                .save(Comment::new(post.id, identity.user_id, input.text))
                .await?;
            tracing::info!(post_id = %post.id, comment_id = %comment.id, "Comment added");
        }
        Err(errors) => {
            tracing::debug!(post_id = %post.id, errors = ?errors.messages(), "Comment dropped");
        }
    }

    Ok(redirect(&Redirect::PostDetail(post.id)))
}
