use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// The body of every reply: a success carrying an optional message and
/// payload, or an error carrying a message and a machine readable code.
#[derive(Debug)]
pub enum Envelope<T> {
    Success {
        message: Option<String>,
        data: Option<T>,
    },
    Error {
        message: String,
        code: &'static str,
        field_errors: Option<HashMap<String, String>>,
    },
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Success { message, data } => {
                let len = 1 + message.is_some() as usize + data.is_some() as usize;
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &true)?;
                if let Some(message) = message {
                    map.serialize_entry("message", message)?;
                }
                if let Some(data) = data {
                    map.serialize_entry("data", data)?;
                }
                map.end()
            }
            Envelope::Error {
                message,
                code,
                field_errors,
            } => {
                let len = 3 + field_errors.is_some() as usize;
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("error", &true)?;
                map.serialize_entry("message", message)?;
                map.serialize_entry("code", code)?;
                if let Some(field_errors) = field_errors {
                    map.serialize_entry("field_errors", field_errors)?;
                }
                map.end()
            }
        }
    }
}

/// Successful reply: status, optional message, payload
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: Option<String>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            message: None,
            status_code: None, // Default to 200 OK
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            message: None,
            status_code: Some(status_code),
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // For 204 No Content, return empty response
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }

        let envelope = Envelope::Success {
            message: self.message,
            data: Some(self.data),
        };
        (status, Json(envelope)).into_response()
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
