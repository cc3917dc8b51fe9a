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
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::api::Pagination;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::block::NewBlock;
use crate::schema::{blocks, friends, users};

use super::{ensure_user_exists, upsert_status};

/// Blocked user entry in the caller's block list
#[derive(Debug, Serialize)]
pub struct BlockDetail {
    pub username: String,
    pub display_name: Option<String>,
    pub blocked_at: DateTime<Utc>,
}

/// Block a user. Also severs follow edges in both directions.
pub async fn block_user(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if auth.username == username {
        return Err(ApiError::Conflict("cannot block yourself".to_string()));
    }

    let mut conn = db_pool.get().await?;
    ensure_user_exists(&mut conn, &username).await?;

    let new_block = NewBlock {
        blocker: auth.username.clone(),
        blocked: username.clone(),
        created_at: Utc::now(),
    };

    let me = auth.username.clone();
    let target = username.clone();
    let inserted = conn
        .transaction::<usize, diesel::result::Error, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(blocks::table)
                    .values(&new_block)
                    .on_conflict((blocks::blocker, blocks::blocked))
                    .do_nothing()
                    .execute(conn)
                    .await?;

                // Blocking severs the follow relationship in both directions
                diesel::delete(
                    friends::table.filter(
                        friends::follower
                            .eq(&me)
                            .and(friends::followed.eq(&target))
                            .or(friends::follower
                                .eq(&target)
                                .and(friends::followed.eq(&me))),
                    ),
                )
                .execute(conn)
                .await?;

                Ok(inserted)
            }
            .scope_boxed()
        })
        .await?;

    debug!("{} blocked {} (created: {})", auth.username, username, inserted > 0);

    Ok((upsert_status(inserted), Json(json!({ "blocked": true }))))
}

/// Unblock a user. Idempotent.
pub async fn unblock_user(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    diesel::delete(
        blocks::table
            .filter(blocks::blocker.eq(&auth.username))
            .filter(blocks::blocked.eq(&username)),
    )
    .execute(&mut conn)
    .await?;

    Ok((StatusCode::OK, Json(json!({ "blocked": false }))))
}

/// Get the caller's block list
pub async fn get_blocks(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    let rows: Vec<(String, Option<String>, DateTime<Utc>)> = blocks::table
        .filter(blocks::blocker.eq(&auth.username))
        .inner_join(users::table.on(users::username.eq(blocks::blocked)))
        .select((users::username, users::display_name, blocks::created_at))
        .order_by(blocks::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .load(&mut conn)
        .await?;

    let total: i64 = blocks::table
        .filter(blocks::blocker.eq(&auth.username))
        .count()
        .get_result(&mut conn)
        .await?;

    let blocked: Vec<BlockDetail> = rows
        .into_iter()
        .map(|(username, display_name, blocked_at)| BlockDetail {
            username,
            display_name,
            blocked_at,
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(json!({
            "blocked": blocked,
            "pagination": pagination.meta(total),
        })),
    ))
}
