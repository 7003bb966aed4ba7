// crates/quill-core/src/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::UserId;
use crate::validation::{Length, ObjectReader, Schema, ValidationError};

/// Longest allowed display name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// A registered user. Posts point at users through `Post::author_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Display name.
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new user from validated input with a freshly generated id.
    pub fn register(input: CreateUserInput, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::generate(),
            email: input.email,
            name: input.name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input of `createUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
}

impl Schema for CreateUserInput {
    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        let mut reader = ObjectReader::new(raw);
        let email = reader.required_email("email");
        let name = reader.required_string("name", Length::between(1, MAX_NAME_LEN));
        let violations = reader.finish();

        match (email, name) {
            (Some(email), Some(name)) if violations.is_empty() => Ok(Self { email, name }),
            _ => Err(ValidationError::new(violations)),
        }
    }
}
