// ABOUTME: User account model for recipe authors
// ABOUTME: Password hashes are stored on the model but never serialized
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Unique username
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Phone number (empty when not provided)
    pub phone_number: String,
    /// Stored profile image path (empty when not provided)
    pub profile_image: String,
    /// Bcrypt password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last profile change
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a freshly generated ID
    #[must_use]
    pub fn new(name: String, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            username,
            email,
            phone_number: String::new(),
            profile_image: String::new(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
