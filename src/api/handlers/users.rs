// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::api::Pagination;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::user::{UpdateUser, User, UserProfile};
use crate::schema::{friends, posts, users};

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    /// Optional case-insensitive substring filter on username/display name
    pub q: Option<String>,
}

/// Get a list of users with pagination, optionally filtered
pub async fn get_users(
    State(db_pool): State<DbPool>,
    Query(query): Query<UsersQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    let pattern = query
        .q
        .as_ref()
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q));

    let total: i64 = match &pattern {
        Some(p) => {
            users::table
                .filter(
                    users::username
                        .ilike(p.clone())
                        .or(users::display_name.ilike(p.clone())),
                )
                .count()
                .get_result(&mut conn)
                .await?
        }
        None => users::table.count().get_result(&mut conn).await?,
    };

    let mut list_query = users::table.select(User::as_select()).into_boxed();
    if let Some(p) = &pattern {
        list_query = list_query.filter(
            users::username
                .ilike(p.clone())
                .or(users::display_name.ilike(p.clone())),
        );
    }

    let users_list: Vec<User> = list_query
        .order(users::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .load(&mut conn)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "users": users_list,
            "pagination": pagination.meta(total),
        })),
    ))
}

/// Get a public profile with follower/following/post counts
pub async fn get_user(
    State(db_pool): State<DbPool>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    debug!("Getting profile for username: {}", username);
    let mut conn = db_pool.get().await?;

    let user: User = users::table
        .filter(users::username.eq(&username))
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("user"))?;

    let followers_count: i64 = friends::table
        .filter(friends::followed.eq(&username))
        .count()
        .get_result(&mut conn)
        .await?;

    let following_count: i64 = friends::table
        .filter(friends::follower.eq(&username))
        .count()
        .get_result(&mut conn)
        .await?;

    let post_count: i64 = posts::table
        .filter(posts::author.eq(&username))
        .filter(posts::parent_id.is_null())
        .count()
        .get_result(&mut conn)
        .await?;

    let profile = UserProfile {
        username: user.username,
        display_name: user.display_name,
        bio: user.bio,
        avatar_url: user.avatar_url,
        created_at: user.created_at,
        followers_count,
        following_count,
        post_count,
    };

    Ok((StatusCode::OK, Json(json!(profile))))
}

/// Update the authenticated user's own profile
pub async fn update_me(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Json(mut changes): Json<UpdateUser>,
) -> Result<impl IntoResponse, ApiError> {
    changes.updated_at = Some(Utc::now());

    let mut conn = db_pool.get().await?;

    let user: User = diesel::update(users::table.filter(users::username.eq(&auth.username)))
        .set(&changes)
        .returning(User::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("user"))?;

    Ok((StatusCode::OK, Json(json!(user))))
}
