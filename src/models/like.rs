// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::likes;

/// Model for a like (user ↔ post join row)
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Like {
    pub id: i32,
    pub username: String,
    pub post_id: i32,
    pub created_at: DateTime<Utc>,
}

/// DTO for recording a like
#[derive(Debug, Insertable)]
#[diesel(table_name = likes)]
pub struct NewLike {
    pub username: String,
    pub post_id: i32,
    pub created_at: DateTime<Utc>,
}

/// User summary in a "liked by" listing
#[derive(Debug, Serialize)]
pub struct LikeDetail {
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub liked_at: DateTime<Utc>,
}
