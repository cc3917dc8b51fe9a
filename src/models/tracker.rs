// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::trackers;

/// Model for a device/notification registration
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = trackers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tracker {
    pub id: i32,
    pub username: String,
    pub device_token: String,
    pub platform: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for registering a device
#[derive(Debug, Insertable)]
#[diesel(table_name = trackers)]
pub struct NewTracker {
    pub username: String,
    pub device_token: String,
    pub platform: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterTrackerRequest {
    #[validate(length(min = 1, max = 255))]
    pub device_token: String,
    /// Client platform, e.g. "ios", "android", "web"
    #[validate(length(min = 1, max = 32))]
    pub platform: String,
}
