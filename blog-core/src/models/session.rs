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

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SESSION_LIFETIME_HOURS: i64 = 24;

/// A server-side login session; its id is the token carried by the cookie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    /// Every form submitted under this session must echo it back
    pub csrf_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: i64, lifetime: Duration, csrf_token: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            csrf_token,
            expires_at: now + lifetime,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let before = Utc::now();
        let session = Session::new(
            42,
            Duration::hours(DEFAULT_SESSION_LIFETIME_HOURS),
            "token".to_string(),
        );
        let after = Utc::now();

        assert_eq!(session.id.len(), 36);
        assert!(Uuid::parse_str(&session.id).is_ok());
        assert_eq!(session.user_id, 42);
        assert!(session.created_at >= before && session.created_at <= after);

        let expected_expiry = session.created_at + Duration::hours(24);
        assert_eq!(session.expires_at, expected_expiry);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = Session::new(1, Duration::hours(1), String::new());
        let b = Session::new(1, Duration::hours(1), String::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_is_expired() {
        let live = Session::new(1, Duration::hours(1), String::new());
        assert!(!live.is_expired());

        let dead = Session::new(1, Duration::seconds(-1), String::new());
        assert!(dead.is_expired());
    }
}
