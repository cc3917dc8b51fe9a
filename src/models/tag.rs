// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::tags;

/// Model for a hashtag with its usage counter
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub usage_count: i32,
    pub last_used_at: DateTime<Utc>,
}

/// DTO for recording a hashtag usage
#[derive(Debug, Insertable)]
#[diesel(table_name = tags)]
pub struct NewTag {
    pub name: String,
    pub usage_count: i32,
    pub last_used_at: DateTime<Utc>,
}
