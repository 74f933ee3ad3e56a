use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::DataError;
use tracing::error;

/// Error returned by every handler, rendered as `{"code": .., "msg": ..}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    msg: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            msg: msg.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        let status = match &err {
            DataError::NotFound { .. } => StatusCode::NOT_FOUND,
            DataError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            msg: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, msg = %self.msg, "request failed");
        }
        let body = json!({ "code": self.status.as_u16(), "msg": self.msg });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let not_found: ApiError = DataError::NotFound {
            path: PathBuf::from("/data/trades.json"),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad: ApiError = DataError::InvalidArgument("modelId required".into()).into();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let parse: ApiError = DataError::Parse {
            path: PathBuf::from("/data/trades.json"),
            source: parse_err,
        }
        .into();
        assert_eq!(parse.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
