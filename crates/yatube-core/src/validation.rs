//! Form validation.
//!
//! Submitted forms arrive as loose strings. Each typed input below checks its
//! fields against an explicit list of rules and either produces the typed
//! value or a [`ValidationErrors`] map keyed by field name.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::Group;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_INVALID_CHOICE: &str = "Select a valid choice.";

/// Maximum length of a username.
pub const USERNAME_MAX_CHARS: usize = 150;
/// Minimum length of a password.
pub const PASSWORD_MIN_CHARS: usize = 8;
/// Maximum length of a stored image path.
pub const IMAGE_PATH_MAX_CHARS: usize = 100;
/// Image file extensions accepted as post attachments.
pub const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpg", "jpeg", "png", "webp"];

/// Validation messages grouped by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Messages for one field, empty if the field is valid.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every message, prefixed with its field name.
    pub fn messages(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{field}: {m}")))
            .collect()
    }

    fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// A rule applied to a text field.
#[derive(Debug, Clone, Copy)]
pub enum TextRule {
    Required,
    MinChars(usize),
    MaxChars(usize),
    /// Every character must satisfy the predicate.
    Charset(fn(char) -> bool, &'static str),
    /// The text must end with `.` followed by one of these extensions (case-insensitive).
    Extension(&'static [&'static str]),
}

impl TextRule {
    fn check(&self, value: &str) -> Option<String> {
        match *self {
            TextRule::Required => value.trim().is_empty().then(|| MSG_REQUIRED.to_string()),
            TextRule::MinChars(min) => (value.chars().count() < min)
                .then(|| format!("Ensure this value has at least {min} characters.")),
            TextRule::MaxChars(max) => (value.chars().count() > max)
                .then(|| format!("Ensure this value has at most {max} characters.")),
            TextRule::Charset(allowed, message) => {
                (!value.chars().all(allowed)).then(|| message.to_string())
            }
            TextRule::Extension(allowed) => {
                let ext = value.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
                match ext {
                    Some(ext) if allowed.contains(&ext.as_str()) => None,
                    _ => Some(format!(
                        "Upload a valid image. Allowed extensions are: {}.",
                        allowed.join(", ")
                    )),
                }
            }
        }
    }
}

/// Run `rules` against `value`, recording the first failure for `field`.
///
/// Empty optional fields skip every rule; put `Required` first to make a field
/// mandatory.
pub fn check_text(errors: &mut ValidationErrors, field: &'static str, value: &str, rules: &[TextRule]) {
    let required = rules.iter().any(|r| matches!(r, TextRule::Required));
    if !required && value.is_empty() {
        return;
    }

    if let Some(message) = rules.iter().find_map(|rule| rule.check(value)) {
        errors.add(field, message);
    }
}

/// Resolve an optional choice among `allowed` ids. Blank means "no choice".
pub fn check_choice(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    allowed: &[Uuid],
) -> Option<Uuid> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
    match Uuid::parse_str(raw) {
        Ok(id) if allowed.contains(&id) => Some(id),
        _ => {
            errors.add(field, MSG_INVALID_CHOICE);
            None
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '/' | '.' | '-' | '_')
}

/// Validated post create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostInput {
    /// Validate a submitted post form; `groups` are the selectable groups.
    pub fn validate(
        text: Option<String>,
        group: Option<String>,
        image: Option<String>,
        groups: &[Group],
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let text = text.unwrap_or_default();
        check_text(&mut errors, "text", &text, &[TextRule::Required]);

        let allowed: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let group_id = check_choice(&mut errors, "group", group.as_deref(), &allowed);

        let image = blank_to_none(image);
        if let Some(path) = &image {
            check_text(
                &mut errors,
                "image",
                path,
                &[
                    TextRule::MaxChars(IMAGE_PATH_MAX_CHARS),
                    TextRule::Charset(is_path_char, "Enter a valid file name."),
                    TextRule::Extension(IMAGE_EXTENSIONS),
                ],
            );
            if path.contains("..") || path.starts_with('/') {
                errors.add("image", "Enter a valid file name.");
            }
        }

        errors.finish(Self {
            text,
            group_id,
            image,
        })
    }
}

/// Validated comment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentInput {
    pub text: String,
}

impl CommentInput {
    pub fn validate(text: Option<String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let text = text.unwrap_or_default();
        check_text(&mut errors, "text", &text, &[TextRule::Required]);
        errors.finish(Self { text })
    }
}

/// Validated sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl SignupInput {
    pub fn validate(
        username: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = username.unwrap_or_default().trim().to_string();
        check_text(
            &mut errors,
            "username",
            &username,
            &[
                TextRule::Required,
                TextRule::MaxChars(USERNAME_MAX_CHARS),
                TextRule::Charset(
                    is_username_char,
                    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
                ),
            ],
        );

        let first_name = first_name.unwrap_or_default().trim().to_string();
        check_text(&mut errors, "first_name", &first_name, &[TextRule::MaxChars(150)]);
        let last_name = last_name.unwrap_or_default().trim().to_string();
        check_text(&mut errors, "last_name", &last_name, &[TextRule::MaxChars(150)]);

        let password = password.unwrap_or_default();
        check_text(
            &mut errors,
            "password",
            &password,
            &[TextRule::Required, TextRule::MinChars(PASSWORD_MIN_CHARS)],
        );

        errors.finish(Self {
            username,
            first_name,
            last_name,
            password,
        })
    }
}
