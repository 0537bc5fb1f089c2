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
use serde::{Deserialize, Serialize};

use crate::models::user::gravatar_url;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Option<i64>,
    pub text: String,
    pub user_id: i64,
    pub post_id: i64,
}

impl Comment {
    pub fn new(text: String, user_id: i64, post_id: i64) -> Result<Self> {
        Self::validate_text(&text).map_err(|e| anyhow::anyhow!("Invalid comment: {}", e))?;

        Ok(Self {
            id: None,
            text,
            user_id,
            post_id,
        })
    }

    pub fn validate_text(text: &str) -> Result<(), String> {
        if text.trim().is_empty() {
            return Err("Comment cannot be empty".to_string());
        }
        Ok(())
    }
}

/// A comment joined with the name and avatar of whoever wrote it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentView {
    pub id: i64,
    pub text: String,
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_avatar: String,
}

impl CommentView {
    pub fn new(comment: Comment, author_name: String, author_email: &str) -> Result<Self> {
        let id = comment
            .id
            .ok_or_else(|| anyhow::anyhow!("Comment view requires a saved comment"))?;

        Ok(Self {
            id,
            text: comment.text,
            post_id: comment.post_id,
            author_id: comment.user_id,
            author_name,
            author_avatar: gravatar_url(author_email),
        })
    }
}
