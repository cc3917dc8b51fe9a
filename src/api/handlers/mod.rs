// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod auth;
pub mod blocking;
pub mod engagement;
pub mod feed;
pub mod health;
pub mod posts;
pub mod search;
pub mod social_graph;
pub mod tags;
pub mod trackers;
pub mod users;

use axum::http::StatusCode;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::collections::HashSet;

use crate::db::DbConnection;
use crate::error::ApiError;
use crate::models::post::{Post, PostView};
use crate::schema::users as users_schema;
use crate::schema::{bookmarks, likes};

/// Status for idempotent edge writes: 201 when the row was inserted,
/// 200 when it already existed.
pub(crate) fn upsert_status(inserted: usize) -> StatusCode {
    if inserted > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

/// Return an error unless a user with this username exists.
pub(crate) async fn ensure_user_exists(
    conn: &mut DbConnection,
    username: &str,
) -> Result<(), ApiError> {
    let count: i64 = users_schema::table
        .filter(users_schema::username.eq(username))
        .count()
        .get_result(conn)
        .await?;
    if count > 0 {
        Ok(())
    } else {
        Err(ApiError::NotFound("user"))
    }
}

/// Annotate posts with the viewer's liked/bookmarked state.
///
/// Anonymous viewers get both flags false; for authenticated viewers the
/// flags are resolved with two batched lookups over the page of post ids.
pub(crate) async fn annotate_posts(
    conn: &mut DbConnection,
    viewer: Option<&str>,
    posts: Vec<Post>,
) -> Result<Vec<PostView>, ApiError> {
    let Some(viewer) = viewer else {
        return Ok(posts
            .into_iter()
            .map(|p| PostView::new(p, false, false))
            .collect());
    };

    let ids: Vec<i32> = posts.iter().map(|p| p.id).collect();

    let liked: HashSet<i32> = likes::table
        .filter(likes::username.eq(viewer))
        .filter(likes::post_id.eq_any(&ids))
        .select(likes::post_id)
        .load::<i32>(conn)
        .await?
        .into_iter()
        .collect();

    let bookmarked: HashSet<i32> = bookmarks::table
        .filter(bookmarks::username.eq(viewer))
        .filter(bookmarks::post_id.eq_any(&ids))
        .select(bookmarks::post_id)
        .load::<i32>(conn)
        .await?
        .into_iter()
        .collect();

    Ok(posts
        .into_iter()
        .map(|p| {
            let is_liked = liked.contains(&p.id);
            let is_bookmarked = bookmarked.contains(&p.id);
            PostView::new(p, is_liked, is_bookmarked)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_status() {
        assert_eq!(upsert_status(1), StatusCode::CREATED);
        assert_eq!(upsert_status(0), StatusCode::OK);
    }
}
