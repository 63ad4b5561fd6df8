//! Account handlers: sign-up, login and logout.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpResponse, http::header, web};

use yatube_core::domain::User;
use yatube_core::error::RepoError;
use yatube_core::validation::SignupInput;
use yatube_shared::dto::{LoginForm, NextQuery, SignupForm};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{LoginPage, SignupPage, render};

const MSG_BAD_CREDENTIALS: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
const MSG_USERNAME_TAKEN: &str = "username: A user with that username already exists.";

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Redirect to `location` carrying a fresh session cookie for `user`.
fn start_session(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.roles())?;

    let cookie = Cookie::build(state.session.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .secure(state.session.secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(state.tokens.expiration_seconds()))
        .finish();

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish())
}

/// GET /auth/signup/
pub async fn signup_form() -> AppResult<HttpResponse> {
    render(&SignupPage {
        username: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        errors: Vec::new(),
    })
}

/// POST /auth/signup/ - creates the account and signs it in.
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let retry = |errors: Vec<String>| SignupPage {
        username: form.username.clone().unwrap_or_default(),
        first_name: form.first_name.clone().unwrap_or_default(),
        last_name: form.last_name.clone().unwrap_or_default(),
        errors,
    };

    let input = match SignupInput::validate(
        form.username.clone(),
        form.first_name.clone(),
        form.last_name.clone(),
        form.password.clone(),
    ) {
        Ok(input) => input,
        Err(errors) => return render(&retry(errors.messages())),
    };

    if state.users.find_by_username(&input.username).await?.is_some() {
        return render(&retry(vec![MSG_USERNAME_TAKEN.to_string()]));
    }

    let password_hash = state.passwords.hash(&input.password)?;
    let user = User::new(input.username, password_hash).with_name(input.first_name, input.last_name);

    let user = match state.users.save(user).await {
        Ok(user) => user,
        // Lost a race against an identical sign-up.
        Err(RepoError::Constraint(_)) => {
            return render(&retry(vec![MSG_USERNAME_TAKEN.to_string()]));
        }
        Err(e) => return Err(AppError::from(e)),
    };

    tracing::info!(username = %user.username, "User signed up");
    start_session(&state, &user, "/")
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> AppResult<HttpResponse> {
    render(&LoginPage {
        username: String::new(),
        next: safe_next(query.next.as_deref()).to_string(),
        error: None,
    })
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let username = form.username.unwrap_or_default().trim().to_string();
    let password = form.password.unwrap_or_default();
    let next = safe_next(form.next.as_deref()).to_string();

    let user = state.users.find_by_username(&username).await?;
    let verified = match &user {
        Some(user) => state.passwords.verify(&password, &user.password_hash)?,
        None => false,
    };

    match user {
        Some(user) if verified => {
            tracing::info!(username = %user.username, "User logged in");
            start_session(&state, &user, &next)
        }
        _ => {
            tracing::debug!(username = %username, "Login rejected");
            render(&LoginPage {
                username,
                next,
                error: Some(MSG_BAD_CREDENTIALS.to_string()),
            })
        }
    }
}

/// POST /auth/logout/
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut cookie = Cookie::build(state.session.cookie_name.clone(), "")
        .path("/")
        .finish();
    cookie.make_removal();

    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish()
}
