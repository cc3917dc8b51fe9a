// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::bookmarks;

/// Model for a bookmark (user ↔ post join row)
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = bookmarks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Bookmark {
    pub id: i32,
    pub username: String,
    pub post_id: i32,
    pub created_at: DateTime<Utc>,
}

/// DTO for recording a bookmark
#[derive(Debug, Insertable)]
#[diesel(table_name = bookmarks)]
pub struct NewBookmark {
    pub username: String,
    pub post_id: i32,
    pub created_at: DateTime<Utc>,
}
