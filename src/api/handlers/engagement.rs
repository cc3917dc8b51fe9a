// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde_json::json;
use tracing::debug;

use crate::api::Pagination;
use crate::auth::AuthUser;
use crate::db::{DbConnection, DbPool};
use crate::error::ApiError;
use crate::models::bookmark::NewBookmark;
use crate::models::like::{LikeDetail, NewLike};
use crate::models::post::Post;
use crate::schema::{bookmarks, likes, posts, users};

use super::{annotate_posts, upsert_status};

async fn ensure_post_exists(conn: &mut DbConnection, post_id: i32) -> Result<(), ApiError> {
    let exists: Option<i32> = posts::table
        .find(post_id)
        .select(posts::id)
        .first(conn)
        .await
        .optional()?;
    if exists.is_some() {
        Ok(())
    } else {
        Err(ApiError::NotFound("post"))
    }
}

/// Like a post. Idempotent; maintains the post's like counter.
pub async fn like_post(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;
    ensure_post_exists(&mut conn, id).await?;

    let new_like = NewLike {
        username: auth.username.clone(),
        post_id: id,
        created_at: Utc::now(),
    };

    let created = conn
        .transaction::<bool, diesel::result::Error, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(likes::table)
                    .values(&new_like)
                    .on_conflict((likes::username, likes::post_id))
                    .do_nothing()
                    .execute(conn)
                    .await?;

                if inserted > 0 {
                    diesel::update(posts::table.find(id))
                        .set(posts::like_count.eq(posts::like_count + 1))
                        .execute(conn)
                        .await?;
                }

                Ok(inserted > 0)
            }
            .scope_boxed()
        })
        .await?;

    debug!("{} liked post {} (created: {})", auth.username, id, created);

    Ok((
        upsert_status(created as usize),
        Json(json!({ "liked": true })),
    ))
}

/// Remove a like. Idempotent.
pub async fn unlike_post(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;
    ensure_post_exists(&mut conn, id).await?;

    let username = auth.username.clone();
    conn.transaction::<(), diesel::result::Error, _>(|conn| {
        async move {
            let removed = diesel::delete(
                likes::table
                    .filter(likes::username.eq(&username))
                    .filter(likes::post_id.eq(id)),
            )
            .execute(conn)
            .await?;

            if removed > 0 {
                diesel::update(posts::table.find(id))
                    .set(posts::like_count.eq(posts::like_count - 1))
                    .execute(conn)
                    .await?;
            }

            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    Ok((StatusCode::OK, Json(json!({ "liked": false }))))
}

/// Get the users who liked a post
pub async fn get_likes(
    State(db_pool): State<DbPool>,
    Path(id): Path<i32>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;
    ensure_post_exists(&mut conn, id).await?;

    let rows: Vec<(String, Option<String>, Option<String>, DateTime<Utc>)> = likes::table
        .filter(likes::post_id.eq(id))
        .inner_join(users::table.on(users::username.eq(likes::username)))
        .select((
            users::username,
            users::display_name,
            users::avatar_url,
            likes::created_at,
        ))
        .order_by(likes::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .load(&mut conn)
        .await?;

    let total: i64 = likes::table
        .filter(likes::post_id.eq(id))
        .count()
        .get_result(&mut conn)
        .await?;

    let users_list: Vec<LikeDetail> = rows
        .into_iter()
        .map(|(username, display_name, avatar_url, liked_at)| LikeDetail {
            username,
            display_name,
            avatar_url,
            liked_at,
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(json!({
            "users": users_list,
            "pagination": pagination.meta(total),
        })),
    ))
}

/// Bookmark a post. Idempotent.
pub async fn bookmark_post(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;
    ensure_post_exists(&mut conn, id).await?;

    let new_bookmark = NewBookmark {
        username: auth.username.clone(),
        post_id: id,
        created_at: Utc::now(),
    };

    let inserted = diesel::insert_into(bookmarks::table)
        .values(&new_bookmark)
        .on_conflict((bookmarks::username, bookmarks::post_id))
        .do_nothing()
        .execute(&mut conn)
        .await?;

    Ok((upsert_status(inserted), Json(json!({ "bookmarked": true }))))
}

/// Remove a bookmark. Idempotent.
pub async fn unbookmark_post(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;
    ensure_post_exists(&mut conn, id).await?;

    diesel::delete(
        bookmarks::table
            .filter(bookmarks::username.eq(&auth.username))
            .filter(bookmarks::post_id.eq(id)),
    )
    .execute(&mut conn)
    .await?;

    Ok((StatusCode::OK, Json(json!({ "bookmarked": false }))))
}

/// Get the caller's bookmarked posts, newest bookmark first
pub async fn get_bookmarks(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    let bookmarked: Vec<Post> = bookmarks::table
        .filter(bookmarks::username.eq(&auth.username))
        .inner_join(posts::table)
        .select(Post::as_select())
        .order_by(bookmarks::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .load(&mut conn)
        .await?;

    let total: i64 = bookmarks::table
        .filter(bookmarks::username.eq(&auth.username))
        .count()
        .get_result(&mut conn)
        .await?;

    let views = annotate_posts(&mut conn, Some(&auth.username), bookmarked).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "posts": views,
            "pagination": pagination.meta(total),
        })),
    ))
}
