// Inkwell - A small multi-user blog built with Rust
// Copyright (C) 2025 Inkwell Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Submitted forms and their field rules.
//!
//! Every field defaults to empty so a missing field shows up as a validation
//! message on the re-rendered form instead of a bare 422.

use blog_core::models::{comment::Comment, post::BlogPost, post::PostContent, user::User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::csrf::CsrfProtected;

/// Field name → message, rendered next to each input
pub type FieldErrors = BTreeMap<String, String>;

const REQUIRED: &str = "required";

/// Run the derived rules and keep one message per field
pub fn validate_form<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(|errors| field_messages(&errors))
}

/// "required" wins over any other rule broken by the same field
fn field_messages(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let message = field_errors
                .iter()
                .find(|e| e.code == REQUIRED)
                .or_else(|| field_errors.first())
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {}", field));
            (field.to_string(), message)
        })
        .collect()
}

fn required_error() -> ValidationError {
    ValidationError::new(REQUIRED).with_message("This field is required.".into())
}

/// Blank after trimming, then the model rule
fn required_then(value: &str, rule: fn(&str) -> Result<(), String>) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(required_error());
    }
    rule(value).map_err(|message| ValidationError::new("invalid").with_message(message.into()))
}

fn required(value: &str) -> Result<(), ValidationError> {
    required_then(value, |_| Ok(()))
}

fn account_email(value: &str) -> Result<(), ValidationError> {
    required_then(value.trim(), User::validate_email)
}

fn display_name(value: &str) -> Result<(), ValidationError> {
    required_then(value, User::validate_name)
}

fn post_title(value: &str) -> Result<(), ValidationError> {
    required_then(value, BlogPost::validate_title)
}

fn post_subtitle(value: &str) -> Result<(), ValidationError> {
    required_then(value, BlogPost::validate_subtitle)
}

/// Only http(s) images, the generic URL rule also accepts `javascript:`
fn web_url(value: &str) -> Result<(), ValidationError> {
    required_then(value.trim(), BlogPost::validate_img_url)
}

/// Judged after sanitising, so a body of only `<script>` counts as empty
fn post_body(value: &str) -> Result<(), ValidationError> {
    required_then(&sanitize_html(value), BlogPost::validate_body)
}

fn comment_text(value: &str) -> Result<(), ValidationError> {
    required_then(&sanitize_html(value), Comment::validate_text)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(
        custom(function = "account_email"),
        email(message = "Invalid email address"),
        length(max = 100, message = "Email cannot exceed 100 characters")
    )]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(custom(function = "required"))]
    pub password: String,
    #[validate(custom(function = "display_name"))]
    pub name: String,
    #[serde(skip_serializing)]
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(
        custom(function = "account_email"),
        email(message = "Invalid email address")
    )]
    pub email: String,
    #[serde(skip_serializing)]
    #[validate(custom(function = "required"))]
    pub password: String,
    #[serde(skip_serializing)]
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(
        custom(function = "post_title"),
        length(max = 250, message = "Title cannot exceed 250 characters")
    )]
    pub title: String,
    #[validate(
        custom(function = "post_subtitle"),
        length(max = 250, message = "Subtitle cannot exceed 250 characters")
    )]
    pub subtitle: String,
    #[validate(url(message = "Invalid URL"), custom(function = "web_url"))]
    pub img_url: String,
    #[validate(custom(function = "post_body"))]
    pub body: String,
    #[serde(skip_serializing)]
    pub csrf_token: String,
}

impl PostForm {
    /// Trimmed post content with the body HTML sanitised
    pub fn into_content(self) -> PostContent {
        PostContent {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            img_url: self.img_url.trim().to_string(),
            body: sanitize_html(&self.body),
        }
    }
}

impl From<PostContent> for PostForm {
    fn from(content: PostContent) -> Self {
        Self {
            title: content.title,
            subtitle: content.subtitle,
            img_url: content.img_url,
            body: content.body,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(custom(function = "comment_text"))]
    pub comment: String,
    #[serde(skip_serializing)]
    pub csrf_token: String,
}

impl CommentForm {
    pub fn sanitized_text(&self) -> String {
        sanitize_html(&self.comment)
    }
}

macro_rules! csrf_protected {
    ($($form:ty),+) => {
        $(impl CsrfProtected for $form {
            fn csrf_token(&self) -> &str {
                &self.csrf_token
            }
        })+
    };
}

csrf_protected!(RegisterForm, LoginForm, PostForm, CommentForm);

/// Rich-text input is stored as HTML; strip anything script-like
pub fn sanitize_html(input: &str) -> String {
    ammonia::clean(input).trim().to_string()
}
