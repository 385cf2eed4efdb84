use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::candidate::InputError;
use crate::front::FrontError;
use crate::transport::TransportError;

/// Request-boundary error, rendered as `{"status": "..."}`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid upload: {0}")]
    Input(#[from] InputError),
    #[error("invalid proxy: {0}")]
    Proxy(#[from] TransportError),
    #[error("proxy address is required")]
    MissingProxy,
    #[error("proxying error: {0}")]
    Front(#[from] FrontError),
    #[error("malformed request body: {0}")]
    Payload(String),
}

#[derive(Serialize)]
pub(crate) struct StatusBody {
    pub status: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Input(_) | Self::Proxy(_) | Self::MissingProxy | Self::Payload(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Front(FrontError::Encode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Front(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        HttpResponse::build(status).json(StatusBody {
            status: self.to_string(),
        })
    }
}
