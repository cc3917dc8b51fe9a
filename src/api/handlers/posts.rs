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
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde_json::json;
use tracing::{debug, info};
use validator::Validate;

use crate::api::Pagination;
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::post::{CreatePostRequest, NewPost, Post};
use crate::models::tag::NewTag;
use crate::schema::{posts, tags};
use crate::text::{extract_hashtags, extract_mentions};

use super::{annotate_posts, ensure_user_exists};

/// Create a post, or a comment when `parent_id` is set.
///
/// Hashtags and mentions are extracted from the content; tag usage counters
/// and the parent's comment counter are updated in the same transaction as
/// the insert.
pub async fn create_post(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let mut conn = db_pool.get().await?;

    if let Some(parent_id) = payload.parent_id {
        let parent_exists: Option<i32> = posts::table
            .find(parent_id)
            .select(posts::id)
            .first(&mut conn)
            .await
            .optional()?;
        if parent_exists.is_none() {
            return Err(ApiError::NotFound("parent post"));
        }
    }

    let hashtags = extract_hashtags(&payload.content);
    let mentions = extract_mentions(&payload.content);
    let now = Utc::now();

    let new_post = NewPost {
        author: auth.username.clone(),
        content: payload.content,
        parent_id: payload.parent_id,
        tags: hashtags.clone(),
        mentions,
        media_url: payload.media_url,
        created_at: now,
        updated_at: now,
    };

    let post = conn
        .transaction::<Post, diesel::result::Error, _>(|conn| {
            async move {
                let post: Post = diesel::insert_into(posts::table)
                    .values(&new_post)
                    .returning(Post::as_returning())
                    .get_result(conn)
                    .await?;

                if let Some(parent_id) = post.parent_id {
                    diesel::update(posts::table.find(parent_id))
                        .set(posts::comment_count.eq(posts::comment_count + 1))
                        .execute(conn)
                        .await?;
                }

                for tag in &hashtags {
                    diesel::insert_into(tags::table)
                        .values(&NewTag {
                            name: tag.clone(),
                            usage_count: 1,
                            last_used_at: now,
                        })
                        .on_conflict(tags::name)
                        .do_update()
                        .set((
                            tags::usage_count.eq(tags::usage_count + 1),
                            tags::last_used_at.eq(now),
                        ))
                        .execute(conn)
                        .await?;
                }

                Ok(post)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_post_insert_error)?;

    info!("Created post {} by {}", post.id, post.author);

    Ok((StatusCode::CREATED, Json(json!(post))))
}

/// The parent-existence pre-check races concurrent deletes; a foreign-key
/// violation on insert means the parent vanished in between, which is still
/// a missing parent to the caller.
fn map_post_insert_error(e: diesel::result::Error) -> ApiError {
    match e {
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            _,
        ) => ApiError::NotFound("parent post"),
        other => ApiError::Database(other),
    }
}

/// Get a single post, annotated with the caller's liked/bookmarked state
pub async fn get_post(
    State(db_pool): State<DbPool>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    let post: Post = posts::table
        .find(id)
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("post"))?;

    let viewer_name = viewer.as_ref().map(|v| v.username.as_str());
    let mut views = annotate_posts(&mut conn, viewer_name, vec![post]).await?;
    let view = views.remove(0);

    Ok((StatusCode::OK, Json(json!(view))))
}

/// Delete a post. Only the author may delete; deleting a comment decrements
/// the parent's comment counter.
pub async fn delete_post(
    State(db_pool): State<DbPool>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    let post: Post = posts::table
        .find(id)
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(ApiError::NotFound("post"))?;

    if post.author != auth.username {
        return Err(ApiError::Forbidden(
            "only the author can delete a post".to_string(),
        ));
    }

    conn.transaction::<(), diesel::result::Error, _>(|conn| {
        async move {
            // Comments, likes and bookmarks cascade at the database level
            diesel::delete(posts::table.find(id)).execute(conn).await?;

            if let Some(parent_id) = post.parent_id {
                diesel::update(posts::table.find(parent_id))
                    .set(posts::comment_count.eq(posts::comment_count - 1))
                    .execute(conn)
                    .await?;
            }

            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    info!("Deleted post {} by {}", id, auth.username);

    Ok((StatusCode::OK, Json(json!({ "deleted": true }))))
}

/// Get the comment thread of a post, oldest first
pub async fn get_comments(
    State(db_pool): State<DbPool>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<i32>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = db_pool.get().await?;

    let parent_exists: Option<i32> = posts::table
        .find(id)
        .select(posts::id)
        .first(&mut conn)
        .await
        .optional()?;
    if parent_exists.is_none() {
        return Err(ApiError::NotFound("post"));
    }

    let comments: Vec<Post> = posts::table
        .filter(posts::parent_id.eq(id))
        .order(posts::created_at.asc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .select(Post::as_select())
        .load(&mut conn)
        .await?;

    let total: i64 = posts::table
        .filter(posts::parent_id.eq(id))
        .count()
        .get_result(&mut conn)
        .await?;

    let viewer_name = viewer.as_ref().map(|v| v.username.as_str());
    let views = annotate_posts(&mut conn, viewer_name, comments).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "comments": views,
            "pagination": pagination.meta(total),
        })),
    ))
}

/// Get a user's top-level posts, newest first
pub async fn get_user_posts(
    State(db_pool): State<DbPool>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(username): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    debug!("Getting posts for username: {}", username);

    let mut conn = db_pool.get().await?;
    ensure_user_exists(&mut conn, &username).await?;

    let user_posts: Vec<Post> = posts::table
        .filter(posts::author.eq(&username))
        .filter(posts::parent_id.is_null())
        .order(posts::created_at.desc())
        .limit(pagination.limit())
        .offset(pagination.offset())
        .select(Post::as_select())
        .load(&mut conn)
        .await?;

    let total: i64 = posts::table
        .filter(posts::author.eq(&username))
        .filter(posts::parent_id.is_null())
        .count()
        .get_result(&mut conn)
        .await?;

    let viewer_name = viewer.as_ref().map(|v| v.username.as_str());
    let views = annotate_posts(&mut conn, viewer_name, user_posts).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "posts": views,
            "pagination": pagination.meta(total),
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_fk_violation_on_insert_is_missing_parent() {
        let err = map_post_insert_error(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key constraint".to_string()),
        ));
        assert!(matches!(err, ApiError::NotFound("parent post")));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_insert_errors_pass_through() {
        let err = map_post_insert_error(diesel::result::Error::RollbackTransaction);
        assert!(matches!(err, ApiError::Database(_)));
    }
}
