//! Service error taxonomy and its HTTP rendering.
//!
//! Each variant maps to exactly one status code. The response body is always
//! `{"error": "..."}`; store failure details are logged, never sent.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ParseTodoIdError, TodoId};
use crate::store::StoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid todo id '{0}'")]
    InvalidId(String),

    #[error("todo {0} not found")]
    NotFound(TodoId),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            StoreError::Unavailable(msg) => ServiceError::StoreUnavailable(msg),
        }
    }
}

impl From<ParseTodoIdError> for ServiceError {
    fn from(e: ParseTodoIdError) -> Self {
        ServiceError::InvalidId(e.0)
    }
}

/// JSON body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            ServiceError::StoreUnavailable(detail) => {
                tracing::error!(%detail, "store unavailable");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(raw: u64) -> TodoId {
        TodoId::new(raw).unwrap()
    }

    #[rstest]
    #[case(ServiceError::Validation("todo body cannot be empty".into()), StatusCode::BAD_REQUEST)]
    #[case(ServiceError::InvalidId("abc".into()), StatusCode::BAD_REQUEST)]
    #[case(ServiceError::NotFound(id(3)), StatusCode::NOT_FOUND)]
    #[case(ServiceError::StoreUnavailable("pool closed".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn each_kind_has_one_status(#[case] error: ServiceError, #[case] expected: StatusCode) {
        assert_eq!(error.status(), expected);
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn store_errors_map_to_service_errors() {
        assert_eq!(
            ServiceError::from(StoreError::NotFound(id(5))),
            ServiceError::NotFound(id(5))
        );
        assert_eq!(
            ServiceError::from(StoreError::Unavailable("timeout".into())),
            ServiceError::StoreUnavailable("timeout".into())
        );
    }

    #[test]
    fn parse_errors_map_to_invalid_id() {
        let err = "x1".parse::<TodoId>().unwrap_err();
        assert_eq!(ServiceError::from(err), ServiceError::InvalidId("x1".into()));
    }

    #[test]
    fn messages_are_client_readable() {
        assert_eq!(
            ServiceError::NotFound(id(8)).to_string(),
            "todo 8 not found"
        );
        assert_eq!(
            ServiceError::InvalidId("zz".into()).to_string(),
            "invalid todo id 'zz'"
        );
    }
}
