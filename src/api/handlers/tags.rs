// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::json;

use crate::api::Pagination;
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::post::Post;
use crate::models::tag::Tag;
use crate::schema::{posts, tags};

use super::annotate_posts;

/// Get hashtags ordered by usage counter
pub async fn get_trending_tags(
    State(db_pool): State<DbPool>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    let trending: Vec<Tag> = tags::table
        .order((tags::usage_count.desc(), tags::last_used_at.desc()))
        .limit(pagination.limit())
        .offset(pagination.offset())
        .select(Tag::as_select())
        .load(&mut conn)
        .await?;

    let total: i64 = tags::table.count().get_result(&mut conn).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "tags": trending,
            "pagination": pagination.meta(total),
        })),
    ))
}

/// Get posts carrying a hashtag, newest first
pub async fn get_tag_posts(
    State(db_pool): State<DbPool>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(name): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    // Tags are stored lowercased
    let name = name.to_lowercase();
    let mut conn = db_pool.get().await?;

    let tagged: Vec<Post> = posts::table
        .filter(posts::tags.contains(vec![name.clone()]))
        .order(posts::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .select(Post::as_select())
        .load(&mut conn)
        .await?;

    let total: i64 = posts::table
        .filter(posts::tags.contains(vec![name]))
        .count()
        .get_result(&mut conn)
        .await?;

    let viewer_name = viewer.as_ref().map(|v| v.username.as_str());
    let views = annotate_posts(&mut conn, viewer_name, tagged).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "posts": views,
            "pagination": pagination.meta(total),
        })),
    ))
}
