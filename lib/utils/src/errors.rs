use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

use http::status::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const VALIDATION_MESSAGE: &str = "Please check your input.";
const NOT_FOUND_MESSAGE: &str = "There's nothing here";
const NOT_A_MEMBER_MESSAGE: &str = "Join this community before posting in it.";
const NOT_AUTHORIZED_MESSAGE: &str = "You're in a restricted area, please do not resist.";
const UNAVAILABLE_MESSAGE: &str = "Sorry, we've got noise on the line.";
const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong.";

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    ValidationError(String),
    NotFound,
    NotAMember,
    InsufficientPrivileges,
    Unavailable(String),
    DatabaseError(String),
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::NotAMember | AppError::InsufficientPrivileges => StatusCode::FORBIDDEN,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(detail) => format!("{VALIDATION_MESSAGE} {detail}"),
            AppError::NotFound => String::from(NOT_FOUND_MESSAGE),
            AppError::NotAMember => String::from(NOT_A_MEMBER_MESSAGE),
            AppError::InsufficientPrivileges => String::from(NOT_AUTHORIZED_MESSAGE),
            AppError::Unavailable(_) => String::from(UNAVAILABLE_MESSAGE),
            AppError::DatabaseError(_) => String::from(INTERNAL_ERROR_MESSAGE),
            AppError::InternalServerError(_) => String::from(INTERNAL_ERROR_MESSAGE),
        }
    }

    /// Constructs a new [`AppError::InternalServerError`] from some other type.
    pub fn new(msg: impl ToString) -> Self {
        Self::InternalServerError(msg.to_string())
    }

    /// Constructs a new [`AppError::ValidationError`] from some other type.
    pub fn validation(msg: impl ToString) -> Self {
        Self::ValidationError(msg.to_string())
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}

impl FromStr for AppError {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => AppError::Unavailable(error.to_string()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl From<std::env::VarError> for AppError {
    fn from(error: std::env::VarError) -> Self {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use http::StatusCode;
    use crate::errors::{AppError, INTERNAL_ERROR_MESSAGE, NOT_A_MEMBER_MESSAGE, NOT_AUTHORIZED_MESSAGE, NOT_FOUND_MESSAGE, UNAVAILABLE_MESSAGE};

    #[test]
    fn test_app_error_status_code() {
        let test_string = String::from("test");
        assert_eq!(AppError::ValidationError(test_string.clone()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NotAMember.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InsufficientPrivileges.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Unavailable(test_string.clone()).status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(AppError::DatabaseError(test_string.clone()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::InternalServerError(test_string).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_app_error_user_message() {
        let test_string = String::from("test");
        assert!(AppError::ValidationError(test_string.clone()).user_message().contains(&test_string));
        assert_eq!(AppError::NotFound.user_message(), String::from(NOT_FOUND_MESSAGE));
        assert_eq!(AppError::NotAMember.user_message(), String::from(NOT_A_MEMBER_MESSAGE));
        assert_eq!(AppError::InsufficientPrivileges.user_message(), String::from(NOT_AUTHORIZED_MESSAGE));
        assert_eq!(AppError::Unavailable(test_string.clone()).user_message(), String::from(UNAVAILABLE_MESSAGE));
        assert_eq!(AppError::DatabaseError(test_string.clone()).user_message(), String::from(INTERNAL_ERROR_MESSAGE));
        assert_eq!(AppError::InternalServerError(test_string).user_message(), String::from(INTERNAL_ERROR_MESSAGE));
    }

    #[test]
    fn test_app_error_new() {
        let test_str = "test";
        assert_eq!(AppError::new(test_str), AppError::InternalServerError(String::from(test_str)));
        assert_eq!(AppError::validation(test_str), AppError::ValidationError(String::from(test_str)));
    }

    #[test]
    fn test_app_error_display_and_from_string() {
        let test_string = String::from("test");
        for error in [
            AppError::ValidationError(test_string.clone()),
            AppError::NotFound,
            AppError::NotAMember,
            AppError::InsufficientPrivileges,
            AppError::Unavailable(test_string.clone()),
            AppError::DatabaseError(test_string.clone()),
            AppError::InternalServerError(test_string),
        ] {
            assert_eq!(
                AppError::from_str(error.to_string().as_str()).expect("AppError should convert to string and back"),
                error,
            );
        }
        assert!(AppError::from_str("invalid").is_err());
    }

    #[test]
    fn test_app_error_from_sqlx_error() {
        let error_string = String::from("test");
        assert_eq!(AppError::from(sqlx::Error::RowNotFound), AppError::NotFound);
        assert_eq!(
            AppError::from(sqlx::Error::PoolTimedOut),
            AppError::Unavailable(sqlx::Error::PoolTimedOut.to_string())
        );
        assert_eq!(
            AppError::from(sqlx::Error::ColumnNotFound(error_string.clone())),
            AppError::DatabaseError(sqlx::Error::ColumnNotFound(error_string).to_string())
        );
    }

    #[test]
    fn test_app_error_from_env_var_error() {
        let env_var_error = std::env::var("not_existing");
        assert!(env_var_error.is_err());
        let env_var_error = env_var_error.unwrap_err();
        assert_eq!(AppError::from(env_var_error.clone()), AppError::InternalServerError(env_var_error.to_string()));
    }
}
