use std::fmt;

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

/// A single failed field check, e.g. `name: is required`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub reason: String,
}

/// Every field check that failed for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub model: &'static str,
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(model: &'static str) -> Self {
        Self { model, errors: Vec::new() }
    }

    pub fn single(model: &'static str, path: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut errors = Self::new(model);
        errors.add(path, reason);
        errors
    }

    pub fn add(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ok when no check failed, otherwise the collected errors
    pub fn into_result(self) -> Result<(), StoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation failed: ", self.model)?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", err.path, err.reason)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The identifier is not a 24 character hex ObjectId
    #[error("Cast to ObjectId failed for value \"{value}\" (type string) at path \"{path}\" for model \"{model}\"")]
    Cast {
        value: String,
        path: &'static str,
        model: &'static str,
    },

    #[error("{model} not found")]
    NotFound { model: &'static str },

    /// A listing matched nothing
    #[error("no {model} documents")]
    NoContent { model: &'static str },

    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Parse a path identifier, failing with a cast error the way the driver would
pub fn parse_object_id(value: &str, model: &'static str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(value).map_err(|_| StoreError::Cast {
        value: value.to_string(),
        path: "_id",
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_each_field() {
        let mut errors = ValidationErrors::new("User");
        errors.add("email", "is required");
        errors.add("password", "is required");

        assert_eq!(
            errors.to_string(),
            "User validation failed: email: is required, password: is required"
        );
    }

    #[test]
    fn empty_validation_is_ok() {
        assert!(ValidationErrors::new("Favs").into_result().is_ok());
    }

    #[test]
    fn malformed_id_is_a_cast_error() {
        let err = parse_object_id("invalidID", "Favs").unwrap_err();
        assert!(matches!(err, StoreError::Cast { .. }));
        assert!(err.to_string().contains("Cast to ObjectId failed"));
        assert!(err.to_string().contains("\"invalidID\""));
    }

    #[test]
    fn well_formed_id_parses() {
        let id = parse_object_id("123456789012345678901234", "Favs").unwrap();
        assert_eq!(id.to_hex(), "123456789012345678901234");
    }
}
