//! Askama templates and the view models they render.
//!
//! View models hold display-ready strings so templates stay free of logic.

use actix_web::{HttpResponse, http::header::ContentType};
use askama::Template;

use yatube_core::Page;
use yatube_core::domain::{Comment, Group, Post, User};

use crate::middleware::error::AppResult;

const DATE_FORMAT: &str = "%d %b %Y";

/// Link to a group page.
#[derive(Debug, Clone)]
pub struct GroupLink {
    pub slug: String,
    pub title: String,
}

impl From<&Group> for GroupLink {
    fn from(group: &Group) -> Self {
        Self {
            slug: group.slug.clone(),
            title: group.title.clone(),
        }
    }
}

/// A post as shown in listings and on its detail page.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub id: String,
    pub text: String,
    pub summary: String,
    pub author_username: String,
    pub author_name: String,
    pub group: Option<GroupLink>,
    pub image: Option<String>,
    pub created: String,
}

impl PostCard {
    pub fn new(post: &Post, author: Option<&User>, group: Option<&Group>) -> Self {
        Self {
            id: post.id.to_string(),
            text: post.text.clone(),
            summary: post.summary(),
            author_username: author.map(|a| a.username.clone()).unwrap_or_default(),
            author_name: author.map(User::display_name).unwrap_or_default(),
            group: group.map(GroupLink::from),
            image: post.image.clone(),
            created: post.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub author_username: String,
    pub author_name: String,
    pub text: String,
    pub created: String,
}

impl CommentView {
    pub fn new(comment: &Comment, author: Option<&User>) -> Self {
        Self {
            author_username: author.map(|a| a.username.clone()).unwrap_or_default(),
            author_name: author.map(User::display_name).unwrap_or_default(),
            text: comment.text.clone(),
            created: comment.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Previous/next links under a listing.
#[derive(Debug, Clone)]
pub struct PageNav {
    pub number: usize,
    pub num_pages: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl<T> From<&Page<T>> for PageNav {
    fn from(page: &Page<T>) -> Self {
        Self {
            number: page.number(),
            num_pages: page.num_pages(),
            previous: page.previous_page_number(),
            next: page.next_page_number(),
        }
    }
}

/// Option of the group selector.
#[derive(Debug, Clone)]
pub struct GroupOption {
    pub id: String,
    pub title: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexPage {
    pub posts: Vec<PostCard>,
    pub nav: PageNav,
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupPage {
    pub title: String,
    pub description: String,
    pub posts: Vec<PostCard>,
    pub nav: PageNav,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfilePage {
    pub username: String,
    pub name: String,
    pub post_count: usize,
    pub follower_count: u64,
    pub following_count: u64,
    /// Viewer is signed in and is not the author.
    pub can_follow: bool,
    pub following: bool,
    pub posts: Vec<PostCard>,
    pub nav: PageNav,
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailPage {
    pub post: PostCard,
    pub author_post_count: u64,
    pub comments: Vec<CommentView>,
    pub can_edit: bool,
    pub can_comment: bool,
}

#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct PostFormPage {
    pub is_edit: bool,
    pub action: String,
    pub text: String,
    pub image: String,
    pub groups: Vec<GroupOption>,
    pub errors: Vec<String>,
}

impl PostFormPage {
    pub fn new(action: String, groups: &[Group]) -> Self {
        Self {
            is_edit: false,
            action,
            text: String::new(),
            image: String::new(),
            groups: group_options(groups, None),
            errors: Vec::new(),
        }
    }

    /// Pre-fill with a post's current values.
    pub fn editing(action: String, post: &Post, groups: &[Group]) -> Self {
        Self {
            is_edit: true,
            action,
            text: post.text.clone(),
            image: post.image.clone().unwrap_or_default(),
            groups: group_options(groups, post.group_id.map(|id| id.to_string()).as_deref()),
            errors: Vec::new(),
        }
    }
}

/// Selector options with `selected` (raw submitted value or stored id) marked.
pub fn group_options(groups: &[Group], selected: Option<&str>) -> Vec<GroupOption> {
    groups
        .iter()
        .map(|group| {
            let id = group.id.to_string();
            GroupOption {
                selected: selected == Some(id.as_str()),
                id,
                title: group.title.clone(),
            }
        })
        .collect()
}

#[derive(Template)]
#[template(path = "posts/follow.html")]
pub struct FollowPage {
    pub posts: Vec<PostCard>,
    pub nav: PageNav,
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginPage {
    pub username: String,
    pub next: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupPage {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "core/error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub title: String,
    pub detail: Option<String>,
}

/// Render a template into a 200 HTML response.
pub fn render<T: Template>(template: &T) -> AppResult<HttpResponse> {
    Ok(html(template.render()?))
}

pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
