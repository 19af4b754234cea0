/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! HTTP error responses.
//!
//! Every failure is a JSON body with an `error` message. Auth
//! failures additionally carry a `redirect` target so browser clients
//! know where to send the user; internal failures carry a `details`
//! string alongside the generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use forgefit::access::AccessError;
use forgefit::ProgramError;

#[derive(Debug)]
pub enum ApiError {
    Program(ProgramError),
    Access(AccessError),
    BadRequest(String),
    /// A proxied or upstream call outside the CMS failed.
    Gateway(String),
}

impl From<ProgramError> for ApiError {
    fn from(e: ProgramError) -> Self {
        ApiError::Program(e)
    }
}

impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        ApiError::Access(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
}

fn body(error: impl Into<String>) -> ErrorBody {
    ErrorBody {
        error: error.into(),
        details: None,
        redirect: None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, payload) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, body(message)),

            ApiError::Gateway(details) => {
                error!(details = %details, "proxied request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: "Download failed".to_string(),
                        details: Some(details),
                        redirect: None,
                    },
                )
            }

            ApiError::Program(ProgramError::Validation(message)) => {
                (StatusCode::BAD_REQUEST, body(message))
            }
            ApiError::Program(ProgramError::NotFound { id }) => (
                StatusCode::NOT_FOUND,
                body(format!("Program not found: {}", id)),
            ),
            ApiError::Program(ProgramError::Conflict { .. }) => (
                StatusCode::CONFLICT,
                body("Program was modified concurrently; reload and retry"),
            ),
            ApiError::Program(err @ ProgramError::Upstream(_)) => {
                error!(error = %err, "program operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Upstream CMS call failed".to_string(),
                        details: Some(err.detail()),
                        redirect: None,
                    },
                )
            }

            ApiError::Access(AccessError::Unauthenticated) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "User not authenticated".to_string(),
                    details: None,
                    redirect: Some("/login"),
                },
            ),
            ApiError::Access(AccessError::Forbidden) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    error: "User not authorized".to_string(),
                    details: None,
                    redirect: Some("/"),
                },
            ),
            ApiError::Access(err @ AccessError::Upstream(_)) => {
                error!(error = %err, "auth service call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Auth service unavailable".to_string(),
                        details: Some(err.to_string()),
                        redirect: None,
                    },
                )
            }
        };

        (status, Json(payload)).into_response()
    }
}
