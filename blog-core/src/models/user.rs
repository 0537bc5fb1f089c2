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
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The user allowed to write, edit and delete posts.
pub const ADMIN_USER_ID: i64 = 1;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$")
        .expect("Failed to compile email regex")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Create a new, not yet persisted user with a hashed password
    pub fn new(email: String, name: String, password: &str) -> Result<Self> {
        Self::validate_email(&email).map_err(|e| anyhow::anyhow!("Invalid email: {}", e))?;
        Self::validate_name(&name).map_err(|e| anyhow::anyhow!("Invalid name: {}", e))?;

        let password_hash = Self::hash_password(password)?;

        Ok(Self {
            id: None,
            email,
            name,
            password_hash,
        })
    }

    /// Hash a password using Argon2 with a random salt
    pub fn hash_password(password: &str) -> Result<String> {
        use argon2::password_hash::rand_core::OsRng;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(password_hash)
    }

    /// Verify a password against the stored hash
    pub fn verify_password(&self, password: &str) -> Result<bool> {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};

        let parsed_hash = PasswordHash::new(&self.password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.id == Some(ADMIN_USER_ID)
    }

    pub fn validate_email(email: &str) -> Result<(), String> {
        if email.is_empty() {
            return Err("Email cannot be empty".to_string());
        }

        if email.len() > 100 {
            return Err("Email cannot exceed 100 characters".to_string());
        }

        if !EMAIL_REGEX.is_match(email) {
            return Err("Invalid email address".to_string());
        }

        Ok(())
    }

    pub fn validate_name(name: &str) -> Result<(), String> {
        if name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }

        if name.chars().count() > 1000 {
            return Err("Name cannot exceed 1000 characters".to_string());
        }

        Ok(())
    }

    /// Validate all user fields
    pub fn is_valid(&self) -> Result<(), String> {
        Self::validate_email(&self.email)?;
        Self::validate_name(&self.name)?;

        if self.password_hash.is_empty() {
            return Err("Password hash cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Build a gravatar image URL for an email address.
///
/// Gravatar accepts SHA-256 hashes of the trimmed, lowercased address.
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let hash = Sha256::digest(normalized.as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{:x}?s=100&d=retro&r=g",
        hash
    )
}
