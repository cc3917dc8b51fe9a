// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::json;
use tracing::debug;

use crate::api::Pagination;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::post::Post;
use crate::schema::{blocks, friends, posts};

use super::annotate_posts;

/// Get the caller's home feed.
///
/// Reverse-chronological union of the caller's own posts and posts from
/// followed accounts, excluding authors with a block edge in either
/// direction, top-level posts only. Each post is annotated with the caller's
/// liked/bookmarked state.
pub async fn get_feed(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let me = auth.username;
    debug!(
        "Computing feed for {}, limit: {}, offset: {}",
        me,
        pagination.limit(),
        pagination.offset()
    );

    let mut conn = db_pool.get().await?;

    let feed_posts: Vec<Post> = posts::table
        .filter(posts::parent_id.is_null())
        .filter(
            posts::author.eq(&me).or(posts::author.eq_any(
                friends::table
                    .filter(friends::follower.eq(&me))
                    .select(friends::followed),
            )),
        )
        .filter(
            posts::author.ne_all(
                blocks::table
                    .filter(blocks::blocker.eq(&me))
                    .select(blocks::blocked),
            ),
        )
        .filter(
            posts::author.ne_all(
                blocks::table
                    .filter(blocks::blocked.eq(&me))
                    .select(blocks::blocker),
            ),
        )
        .order(posts::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .select(Post::as_select())
        .load(&mut conn)
        .await?;

    let total: i64 = posts::table
        .filter(posts::parent_id.is_null())
        .filter(
            posts::author.eq(&me).or(posts::author.eq_any(
                friends::table
                    .filter(friends::follower.eq(&me))
                    .select(friends::followed),
            )),
        )
        .filter(
            posts::author.ne_all(
                blocks::table
                    .filter(blocks::blocker.eq(&me))
                    .select(blocks::blocked),
            ),
        )
        .filter(
            posts::author.ne_all(
                blocks::table
                    .filter(blocks::blocked.eq(&me))
                    .select(blocks::blocker),
            ),
        )
        .count()
        .get_result(&mut conn)
        .await?;

    let views = annotate_posts(&mut conn, Some(&me), feed_posts).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "posts": views,
            "pagination": pagination.meta(total),
        })),
    ))
}
