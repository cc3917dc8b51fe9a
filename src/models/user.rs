// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::users;

/// Model for a user account
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    // Never serialized into API responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for inserting a new user
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for profile updates
#[derive(Debug, AsChangeset, Deserialize)]
#[diesel(table_name = users)]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Registration payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32), custom(function = validate_username))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub display_name: Option<String>,
}

/// Login payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public profile with social-graph counts
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers_count: i64,
    pub following_count: i64,
    pub post_count: i64,
}

fn validate_username(username: &str) -> Result<(), validator::ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(validator::ValidationError::new(
            "username may only contain letters, digits and underscores",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            username: "ada_lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "correct horse battery".to_string(),
            display_name: None,
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_bad_username() {
        let bad = RegisterRequest {
            username: "ada lovelace!".to_string(),
            email: "ada@example.com".to_string(),
            password: "correct horse battery".to_string(),
            display_name: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_register_rejects_short_password() {
        let bad = RegisterRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
            display_name: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let bad = RegisterRequest {
            username: "ada".to_string(),
            email: "not-an-email".to_string(),
            password: "correct horse battery".to_string(),
            display_name: None,
        };
        assert!(bad.validate().is_err());
    }
}
