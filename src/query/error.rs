use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::ArchiveError;

/// 请求级错误：只影响当前响应，不影响索引与其它请求
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("not found")]
    NotFound,

    #[error("unable to open comic strip {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: ArchiveError,
    },

    #[error("unable to serve comic strip {path}: {source}")]
    Copy {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request worker failed: {0}")]
    Worker(String),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServeError::NotFound => (StatusCode::NOT_FOUND, "404 page not found"),
            ServeError::Open { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Unable to open comic strip")
            }
            ServeError::Copy { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Unable to serve comic strip")
            }
            ServeError::Worker(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        // 404 是正常查询结果，不记错误日志
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, body).into_response()
    }
}
