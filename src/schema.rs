// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::allow_tables_to_appear_in_same_query;
use diesel::joinable;
use diesel::table;

table! {
    users (id) {
        id -> Integer,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        display_name -> Nullable<Varchar>,
        bio -> Nullable<Text>,
        avatar_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    posts (id) {
        id -> Integer,
        author -> Varchar,
        content -> Text,
        parent_id -> Nullable<Integer>,
        like_count -> Integer,
        comment_count -> Integer,
        tags -> Array<Text>,
        mentions -> Array<Text>,
        media_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    likes (id) {
        id -> Integer,
        username -> Varchar,
        post_id -> Integer,
        created_at -> Timestamptz,
    }
}

table! {
    bookmarks (id) {
        id -> Integer,
        username -> Varchar,
        post_id -> Integer,
        created_at -> Timestamptz,
    }
}

table! {
    friends (id) {
        id -> Integer,
        follower -> Varchar,
        followed -> Varchar,
        created_at -> Timestamptz,
    }
}

table! {
    tags (id) {
        id -> Integer,
        name -> Varchar,
        usage_count -> Integer,
        last_used_at -> Timestamptz,
    }
}

table! {
    trackers (id) {
        id -> Integer,
        username -> Varchar,
        device_token -> Varchar,
        platform -> Varchar,
        created_at -> Timestamptz,
    }
}

table! {
    blocks (id) {
        id -> Integer,
        blocker -> Varchar,
        blocked -> Varchar,
        created_at -> Timestamptz,
    }
}

joinable!(likes -> posts (post_id));
joinable!(bookmarks -> posts (post_id));

// Allow joining the tables if needed
allow_tables_to_appear_in_same_query!(
    users, posts, likes, bookmarks, friends, tags, trackers, blocks,
);
