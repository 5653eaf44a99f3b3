//! Error to response mapping
//!
//! | Condition | Status |
//! |-----------|--------|
//! | Admission rejected | 429 + `Retry-After` |
//! | `MalformedInput` | 400 |
//! | `StoreUnavailable` | 503 |
//! | `Origin` and everything else | 500 |
//!
//! Bodies are `{"message": ...}` JSON objects.

use crate::constants::*;
use gatehouse_domain::error::Error;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use rocket::Request;
use std::io::Cursor;
use std::time::Duration;
use tracing::{error, warn};

/// Failure of a request handler
#[derive(Debug)]
pub enum ApiError {
    /// The caller exceeded its admission window
    TooManyRequests {
        /// Time until the window resets
        retry_after: Duration,
    },
    /// A use case failed
    Domain(Error),
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self::Domain(error)
    }
}

impl ApiError {
    /// Response status for this error
    pub fn status(&self) -> Status {
        match self {
            Self::TooManyRequests { .. } => Status::TooManyRequests,
            Self::Domain(Error::MalformedInput { .. }) => Status::BadRequest,
            Self::Domain(Error::StoreUnavailable { .. }) => Status::ServiceUnavailable,
            Self::Domain(_) => Status::InternalServerError,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::TooManyRequests { .. } => MSG_TOO_MANY_REQUESTS.to_string(),
            Self::Domain(Error::MalformedInput { message }) => message.clone(),
            Self::Domain(Error::StoreUnavailable { .. }) => MSG_STORE_UNAVAILABLE.to_string(),
            Self::Domain(_) => MSG_INTERNAL_ERROR.to_string(),
        }
    }
}

/// Whole seconds, rounded up
pub fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs();
    if retry_after.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        match &self {
            Self::TooManyRequests { .. } => {}
            Self::Domain(e) if status == Status::InternalServerError => {
                error!(uri = %request.uri(), error = %e, "Request failed");
            }
            Self::Domain(e) => warn!(uri = %request.uri(), status = status.code, error = %e, "Request refused"),
        }

        let body = serde_json::json!({ "message": self.message() }).to_string();
        let mut response = Response::build();
        response
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body));
        if let Self::TooManyRequests { retry_after } = self {
            response.raw_header(RETRY_AFTER_HEADER, retry_after_secs(retry_after).to_string());
        }
        response.ok()
    }
}
