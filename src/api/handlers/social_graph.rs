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
use diesel_async::RunQueryDsl;
use serde_json::json;
use tracing::debug;

use crate::api::Pagination;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::friend::{FollowDetail, NewFriend};
use crate::schema::{blocks, friends, users};

use super::{ensure_user_exists, upsert_status};

/// Follow a user. Idempotent: following an already-followed user is a no-op.
pub async fn follow_user(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if auth.username == username {
        return Err(ApiError::Conflict("cannot follow yourself".to_string()));
    }

    let mut conn = db_pool.get().await?;
    ensure_user_exists(&mut conn, &username).await?;

    // A block in either direction forbids the edge
    let block_count: i64 = blocks::table
        .filter(
            blocks::blocker
                .eq(&auth.username)
                .and(blocks::blocked.eq(&username))
                .or(blocks::blocker
                    .eq(&username)
                    .and(blocks::blocked.eq(&auth.username))),
        )
        .count()
        .get_result(&mut conn)
        .await?;
    if block_count > 0 {
        return Err(ApiError::Forbidden(
            "cannot follow this user".to_string(),
        ));
    }

    let new_friend = NewFriend {
        follower: auth.username.clone(),
        followed: username.clone(),
        created_at: Utc::now(),
    };

    let inserted = diesel::insert_into(friends::table)
        .values(&new_friend)
        .on_conflict((friends::follower, friends::followed))
        .do_nothing()
        .execute(&mut conn)
        .await?;

    debug!("{} follows {} (created: {})", auth.username, username, inserted > 0);

    Ok((upsert_status(inserted), Json(json!({ "following": true }))))
}

/// Unfollow a user
pub async fn unfollow_user(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;
    ensure_user_exists(&mut conn, &username).await?;

    diesel::delete(
        friends::table
            .filter(friends::follower.eq(&auth.username))
            .filter(friends::followed.eq(&username)),
    )
    .execute(&mut conn)
    .await?;

    Ok((StatusCode::OK, Json(json!({ "following": false }))))
}

/// Get a list of profiles that follow a user
pub async fn get_followers(
    State(db_pool): State<DbPool>,
    Path(username): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(
        "Getting followers for username: {}, limit: {}, offset: {}",
        username,
        pagination.limit(),
        pagination.offset()
    );

    let mut conn = db_pool.get().await?;
    ensure_user_exists(&mut conn, &username).await?;

    let rows: Vec<(String, Option<String>, Option<String>, DateTime<Utc>)> = friends::table
        .filter(friends::followed.eq(&username))
        .inner_join(users::table.on(users::username.eq(friends::follower)))
        .select((
            users::username,
            users::display_name,
            users::avatar_url,
            friends::created_at,
        ))
        .order_by(friends::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .load(&mut conn)
        .await?;

    let total: i64 = friends::table
        .filter(friends::followed.eq(&username))
        .count()
        .get_result(&mut conn)
        .await?;

    let profiles: Vec<FollowDetail> = rows
        .into_iter()
        .map(
            |(username, display_name, avatar_url, followed_at)| FollowDetail {
                username,
                display_name,
                avatar_url,
                followed_at,
            },
        )
        .collect();

    Ok((
        StatusCode::OK,
        Json(json!({
            "profiles": profiles,
            "pagination": pagination.meta(total),
        })),
    ))
}

/// Get a list of profiles that a user is following
pub async fn get_following(
    State(db_pool): State<DbPool>,
    Path(username): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(
        "Getting following for username: {}, limit: {}, offset: {}",
        username,
        pagination.limit(),
        pagination.offset()
    );

    let mut conn = db_pool.get().await?;
    ensure_user_exists(&mut conn, &username).await?;

    let rows: Vec<(String, Option<String>, Option<String>, DateTime<Utc>)> = friends::table
        .filter(friends::follower.eq(&username))
        .inner_join(users::table.on(users::username.eq(friends::followed)))
        .select((
            users::username,
            users::display_name,
            users::avatar_url,
            friends::created_at,
        ))
        .order_by(friends::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .load(&mut conn)
        .await?;

    let total: i64 = friends::table
        .filter(friends::follower.eq(&username))
        .count()
        .get_result(&mut conn)
        .await?;

    let profiles: Vec<FollowDetail> = rows
        .into_iter()
        .map(
            |(username, display_name, avatar_url, followed_at)| FollowDetail {
                username,
                display_name,
                avatar_url,
                followed_at,
            },
        )
        .collect();

    Ok((
        StatusCode::OK,
        Json(json!({
            "profiles": profiles,
            "pagination": pagination.meta(total),
        })),
    ))
}
