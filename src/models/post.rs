// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::posts;

/// Model for a post. A post with a `parent_id` is a comment.
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: i32,
    pub author: String,
    pub content: String,
    pub parent_id: Option<i32>,
    pub like_count: i32,
    pub comment_count: i32,
    pub tags: Vec<String>,
    pub mentions: Vec<String>,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for inserting a new post or comment
#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub author: String,
    pub content: String,
    pub parent_id: Option<i32>,
    pub tags: Vec<String>,
    pub mentions: Vec<String>,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for posts and comments
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
    pub parent_id: Option<i32>,
    #[validate(url)]
    pub media_url: Option<String>,
}

/// A post annotated with the caller's liked/bookmarked state
#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub liked: bool,
    pub bookmarked: bool,
}

impl PostView {
    pub fn new(post: Post, liked: bool, bookmarked: bool) -> Self {
        Self {
            post,
            liked,
            bookmarked,
        }
    }
}
