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

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Display format for post dates, e.g. "October 16, 2026"
pub const POST_DATE_FORMAT: &str = "%B %d, %Y";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogPost {
    pub id: Option<i64>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
    pub user_id: i64,
}

/// The author-editable fields of a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostContent {
    pub title: String,
    pub subtitle: String,
    pub img_url: String,
    pub body: String,
}

impl BlogPost {
    /// Create a new post written by `author` on `date`
    pub fn new(content: PostContent, author: &User, date: NaiveDate) -> Result<Self> {
        let user_id = author
            .id
            .ok_or_else(|| anyhow::anyhow!("Post author must be a saved user"))?;

        let post = Self {
            id: None,
            title: content.title,
            subtitle: content.subtitle,
            author: author.name.clone(),
            date: format_post_date(date),
            body: content.body,
            img_url: content.img_url,
            user_id,
        };

        post.is_valid()
            .map_err(|e| anyhow::anyhow!("Invalid post: {}", e))?;

        Ok(post)
    }

    /// Overwrite the editable fields, keeping id, author, date and owner
    pub fn apply(&mut self, content: PostContent) {
        self.title = content.title;
        self.subtitle = content.subtitle;
        self.img_url = content.img_url;
        self.body = content.body;
    }

    pub fn content(&self) -> PostContent {
        PostContent {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            img_url: self.img_url.clone(),
            body: self.body.clone(),
        }
    }

    pub fn validate_title(title: &str) -> Result<(), String> {
        if title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if title.chars().count() > 250 {
            return Err("Title cannot exceed 250 characters".to_string());
        }
        Ok(())
    }

    pub fn validate_subtitle(subtitle: &str) -> Result<(), String> {
        if subtitle.trim().is_empty() {
            return Err("Subtitle cannot be empty".to_string());
        }
        if subtitle.chars().count() > 250 {
            return Err("Subtitle cannot exceed 250 characters".to_string());
        }
        Ok(())
    }

    /// Image URLs must be absolute http(s) URLs
    pub fn validate_img_url(img_url: &str) -> Result<(), String> {
        if img_url.trim().is_empty() {
            return Err("Image URL cannot be empty".to_string());
        }
        if img_url.len() > 250 {
            return Err("Image URL cannot exceed 250 characters".to_string());
        }
        match url::Url::parse(img_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
            _ => Err("Invalid URL".to_string()),
        }
    }

    pub fn validate_body(body: &str) -> Result<(), String> {
        if body.trim().is_empty() {
            return Err("Body cannot be empty".to_string());
        }
        Ok(())
    }

    pub fn is_valid(&self) -> Result<(), String> {
        Self::validate_title(&self.title)?;
        Self::validate_subtitle(&self.subtitle)?;
        Self::validate_img_url(&self.img_url)?;
        Self::validate_body(&self.body)?;

        if self.author.trim().is_empty() {
            return Err("Author cannot be empty".to_string());
        }

        Ok(())
    }
}

pub fn format_post_date(date: NaiveDate) -> String {
    date.format(POST_DATE_FORMAT).to_string()
}
