// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::blocks;

/// Model for a block relationship (directed edge blocker → blocked)
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = blocks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Block {
    pub id: i32,
    pub blocker: String,
    pub blocked: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a block
#[derive(Debug, Insertable)]
#[diesel(table_name = blocks)]
pub struct NewBlock {
    pub blocker: String,
    pub blocked: String,
    pub created_at: DateTime<Utc>,
}
