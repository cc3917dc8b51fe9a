// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::auth::{hash_password, mint_token, verify_password};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::user::{LoginRequest, NewUser, RegisterRequest, User};
use crate::schema::users;

/// Create a new account and return an access token.
pub async fn register(
    State(db_pool): State<DbPool>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let password_hash = hash_password(&payload.password)?;
    let now = Utc::now();
    let new_user = NewUser {
        username: payload.username,
        email: payload.email,
        password_hash,
        display_name: payload.display_name,
        created_at: now,
        updated_at: now,
    };

    let mut conn = db_pool.get().await?;

    // The unique indexes on username/email turn duplicates into a 409
    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => ApiError::Conflict("username or email already taken".to_string()),
            other => ApiError::Database(other),
        })?;

    info!("Registered new user: {}", user.username);

    let config = Config::get();
    let token = mint_token(
        &user.username,
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "token": token, "user": user })),
    ))
}

/// Verify credentials and return an access token.
pub async fn login(
    State(db_pool): State<DbPool>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    let user: User = users::table
        .filter(users::username.eq(&payload.username))
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::InvalidCredentials)?;

    verify_password(&payload.password, &user.password_hash)?;

    let config = Config::get();
    let token = mint_token(
        &user.username,
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    )?;

    Ok((
        StatusCode::OK,
        Json(json!({ "token": token, "user": user })),
    ))
}
