use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::{non_blank, serialize_object_id};
use crate::database::error::{StoreError, ValidationErrors};

pub const MODEL: &str = "User";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// bcrypt hash, never sent to clients
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Body of a registration request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// A registration that passed every field check; the password is still plain text
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// A user ready to be stored
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

impl RegisterUser {
    pub fn validate(self) -> Result<ValidRegistration, StoreError> {
        let mut errors = ValidationErrors::new(MODEL);

        let email = normalize_email(self.email.as_deref());
        match &email {
            None => errors.add("email", "is required"),
            Some(email) if !email.validate_email() => errors.add("email", "invalid email address"),
            Some(_) => {}
        }

        let password = self.password.filter(|p| !p.is_empty());
        if password.is_none() {
            errors.add("password", "is required");
        }
        errors.into_result()?;

        Ok(ValidRegistration {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            name: non_blank(self.name.as_deref()),
        })
    }
}

impl User {
    pub fn new(new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            email: new_user.email,
            name: new_user.name,
            password: new_user.password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Emails are stored trimmed and lower-cased, so lookups must match that
pub fn normalize_email(email: Option<&str>) -> Option<String> {
    non_blank(email).map(|e| e.to_lowercase())
}

pub(crate) fn email_taken() -> StoreError {
    StoreError::Validation(ValidationErrors::single(MODEL, "email", "is already taken"))
}
