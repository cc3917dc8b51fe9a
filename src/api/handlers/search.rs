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
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::api::Pagination;
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::post::Post;
use crate::models::user::User;
use crate::schema::{posts, users};

use super::annotate_posts;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Case-insensitive substring search over post content and user names.
/// Returns matching posts and users side by side.
pub async fn search(
    State(db_pool): State<DbPool>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(query): Query<SearchQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let term = query.q.trim();
    if term.is_empty() {
        return Err(ApiError::Validation(
            "search query must not be empty".to_string(),
        ));
    }
    debug!("Searching for: {}", term);

    let pattern = format!("%{}%", term);
    let mut conn = db_pool.get().await?;

    let matched_posts: Vec<Post> = posts::table
        .filter(posts::content.ilike(pattern.clone()))
        .order(posts::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .select(Post::as_select())
        .load(&mut conn)
        .await?;

    let post_total: i64 = posts::table
        .filter(posts::content.ilike(pattern.clone()))
        .count()
        .get_result(&mut conn)
        .await?;

    let matched_users: Vec<User> = users::table
        .filter(
            users::username
                .ilike(pattern.clone())
                .or(users::display_name.ilike(pattern.clone())),
        )
        .order(users::username.asc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .select(User::as_select())
        .load(&mut conn)
        .await?;

    let user_total: i64 = users::table
        .filter(
            users::username
                .ilike(pattern.clone())
                .or(users::display_name.ilike(pattern)),
        )
        .count()
        .get_result(&mut conn)
        .await?;

    let viewer_name = viewer.as_ref().map(|v| v.username.as_str());
    let post_views = annotate_posts(&mut conn, viewer_name, matched_posts).await?;

    Ok((
        StatusCode::OK,
        Json(search_response(
            post_views,
            post_total,
            matched_users,
            user_total,
            &pagination,
        )),
    ))
}

/// Assemble the search response with per-list pagination metadata.
fn search_response(
    posts: Vec<crate::models::post::PostView>,
    post_total: i64,
    users: Vec<User>,
    user_total: i64,
    pagination: &Pagination,
) -> serde_json::Value {
    json!({
        "posts": posts,
        "users": users,
        "pagination": {
            "posts": pagination.meta(post_total),
            "users": pagination.meta(user_total),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_carries_per_list_pagination() {
        let pagination = Pagination {
            limit: Some(10),
            offset: None,
            page: None,
        };
        let body = search_response(Vec::new(), 25, Vec::new(), 3, &pagination);
        assert_eq!(body["pagination"]["posts"]["total"], 25);
        assert_eq!(body["pagination"]["posts"]["total_pages"], 3);
        assert_eq!(body["pagination"]["users"]["total"], 3);
        assert_eq!(body["pagination"]["users"]["total_pages"], 1);
    }
}
