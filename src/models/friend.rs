// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::friends;

/// Model for a follow relationship (directed edge follower → followed)
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = friends)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Friend {
    pub id: i32,
    pub follower: String,
    pub followed: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new follow relationship
#[derive(Debug, Insertable)]
#[diesel(table_name = friends)]
pub struct NewFriend {
    pub follower: String,
    pub followed: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for follower/following listings with profile details
#[derive(Debug, Serialize, Deserialize)]
pub struct FollowDetail {
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    // When the relationship was created
    pub followed_at: DateTime<Utc>,
}
