// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use serde_json::json;
use tracing::debug;
use validator::Validate;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::tracker::{NewTracker, RegisterTrackerRequest, Tracker};
use crate::schema::trackers;

/// Register a device for notifications. Re-registering an existing token
/// reassigns it to the caller.
pub async fn register_tracker(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Json(payload): Json<RegisterTrackerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let new_tracker = NewTracker {
        username: auth.username.clone(),
        device_token: payload.device_token,
        platform: payload.platform,
        created_at: Utc::now(),
    };

    let mut conn = db_pool.get().await?;

    let tracker: Tracker = diesel::insert_into(trackers::table)
        .values(&new_tracker)
        .on_conflict(trackers::device_token)
        .do_update()
        .set((
            trackers::username.eq(excluded(trackers::username)),
            trackers::platform.eq(excluded(trackers::platform)),
            trackers::created_at.eq(excluded(trackers::created_at)),
        ))
        .returning(Tracker::as_returning())
        .get_result(&mut conn)
        .await?;

    debug!(
        "Registered tracker for {} on {}",
        tracker.username, tracker.platform
    );

    Ok((StatusCode::CREATED, Json(json!(tracker))))
}

/// Deregister a device token. Only the owner may remove it.
pub async fn delete_tracker(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    let removed = diesel::delete(
        trackers::table
            .filter(trackers::device_token.eq(&token))
            .filter(trackers::username.eq(&auth.username)),
    )
    .execute(&mut conn)
    .await?;

    if removed == 0 {
        return Err(ApiError::NotFound("tracker"));
    }

    Ok((StatusCode::OK, Json(json!({ "deleted": true }))))
}
