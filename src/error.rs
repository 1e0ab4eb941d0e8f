use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

pub const ENV_VAR_ERROR: i32 = 1;
pub const CONFIGURATION_ERROR: i32 = 2;
pub const REQWEST_ERROR: i32 = 3;
pub const UPSTREAM_ERROR: i32 = 4;
pub const UNEXPECTED_ERROR: i32 = 5;
pub const INVALID_INPUT_ERROR: i32 = 101;
pub const VALIDATION_ERROR: i32 = 102;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
    /// Name of the offending input field, set for validation errors.
    pub field: Option<String>,
}

impl Error {
    pub fn is_validation_error(&self) -> bool {
        self.code == VALIDATION_ERROR
    }

    pub fn is_configuration_error(&self) -> bool {
        self.code == CONFIGURATION_ERROR
    }

    pub fn is_internal(&self) -> bool {
        (1..=99).contains(&self.code)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {} ({})", self.code, self.message, field),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        configuration_error(format!("unable to read configuration: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        configuration_error(format!("malformed configuration: {}", err))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            CONFIGURATION_ERROR => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "unable to calculate fare right now",
            ),
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = match &self.field {
            Some(field) if !self.is_internal() => Json(json!({
                "code": self.code,
                "error": error_message,
                "field": field,
            })),
            _ => Json(json!({
                "code": self.code,
                "error": error_message,
            })),
        };

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: INVALID_INPUT_ERROR,
        message: "invalid input".into(),
        field: None,
    }
}

pub fn validation_error(field: &str, reason: &str) -> Error {
    Error {
        code: VALIDATION_ERROR,
        message: format!("invalid {}: {}", field, reason),
        field: Some(field.into()),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: ENV_VAR_ERROR,
        message: "environment variable error".into(),
        field: None,
    }
}

pub fn configuration_error<T: Display>(detail: T) -> Error {
    Error {
        code: CONFIGURATION_ERROR,
        message: format!("configuration error: {}", detail),
        field: None,
    }
}

pub fn reqwest_error(_: reqwest::Error) -> Error {
    Error {
        code: REQWEST_ERROR,
        message: "reqwest error".into(),
        field: None,
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: UPSTREAM_ERROR,
        message: "upstream error".into(),
        field: None,
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: UNEXPECTED_ERROR,
        message: "unexpected error".into(),
        field: None,
    }
}
