use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

use crate::schemas::FriendId;

/// Why a user action left the state untouched.
///
/// These never turn into HTTP errors: a rejected action is a silent no-op
/// and the reason is only reported alongside the unchanged snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("friend name is empty")]
    EmptyName,
    #[error("image url is empty")]
    EmptyImage,
    #[error("a friend with id {0} already exists")]
    DuplicateFriend(FriendId),
    #[error("no friend with id {0}")]
    UnknownFriend(FriendId),
    #[error("no friend is selected")]
    NoSelection,
    #[error("bill value is not set")]
    BillUnset,
    #[error("your expense is not set")]
    UserPaidUnset,
    #[error("your expense {user_paid} exceeds the bill {bill}")]
    UserPaidExceedsBill { user_paid: f64, bill: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("application state is unavailable")]
    StatePoisoned,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
