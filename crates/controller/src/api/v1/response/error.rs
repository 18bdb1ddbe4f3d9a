// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Error responses of the REST API
//!
//! Every error is sent as JSON with a machine readable `code` and a human readable `message`.
//! Failed field validations additionally list the offending fields in `errors`.
use super::{CODE_INVALID_LENGTH, CODE_INVALID_VALUE, CODE_OUT_OF_RANGE, CODE_VALUE_REQUIRED};
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::header::{self, HeaderValue, TryIntoHeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use actix_web_httpauth::headers::www_authenticate::bearer::{self, Bearer};
use database::DatabaseError;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use validator::ValidationErrors;

/// Maps rejected JSON bodies to `400 Bad Request`
pub fn json_error_handler(err: JsonPayloadError, _: &HttpRequest) -> actix_web::error::Error {
    let code = match &err {
        JsonPayloadError::ContentType => "invalid_content_type",
        JsonPayloadError::Deserialize(_) => "invalid_json",
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "payload_overflow"
        }
        _ => "invalid_payload",
    };

    ApiError::bad_request(code, err.to_string()).into()
}

/// Maps rejected query strings to `400 Bad Request`
pub fn query_error_handler(err: QueryPayloadError, _: &HttpRequest) -> actix_web::error::Error {
    ApiError::bad_request("invalid_query", err.to_string()).into()
}

/// Why a request could not be authenticated
#[derive(Debug, Clone, Copy)]
pub enum AuthenticationError {
    MissingToken,
    InvalidToken,
}

impl AuthenticationError {
    fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "Authentication credentials were not provided",
            Self::InvalidToken => "The provided token is invalid",
        }
    }

    /// Bearer challenge for the `WWW-Authenticate` header
    fn challenge(self) -> Option<HeaderValue> {
        let error = match self {
            Self::MissingToken => bearer::Error::InvalidRequest,
            Self::InvalidToken => bearer::Error::InvalidToken,
        };

        Bearer::build()
            .error(error)
            .error_description(self.message())
            .finish()
            .try_into_value()
            .ok()
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    field: &'static str,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<Cow<'static, str>>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: Cow<'static, str>,
    message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

/// Error returned by all REST endpoints
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    www_authenticate: Option<HeaderValue>,
    body: ErrorBody,
}

impl ApiError {
    fn new(
        status: StatusCode,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            status,
            www_authenticate: None,
            body: ErrorBody {
                code: code.into(),
                message: message.into(),
                errors: Vec::new(),
            },
        }
    }

    /// 400, the request could not be parsed
    pub fn bad_request(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// 401 with a bearer challenge
    pub fn unauthorized(reason: AuthenticationError) -> Self {
        Self {
            www_authenticate: reason.challenge(),
            ..Self::new(StatusCode::UNAUTHORIZED, "unauthorized", reason.message())
        }
    }

    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "forbidden",
            "You do not have permission to perform this action",
        )
    }

    pub fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "not_found",
            "A requested resource could not be found",
        )
    }

    pub fn conflict() -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "conflict",
            "The request references a resource that does not exist anymore",
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_server_error",
            "An internal server error occurred",
        )
    }

    /// 422 listing every invalid field, ordered by field name
    fn validation_failed(mut errors: Vec<FieldError>) -> Self {
        errors.sort_by_key(|error| error.field);

        let mut error = Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_failed",
            "Some provided values are invalid",
        );
        error.body.errors = errors;
        error
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.status.as_u16(),
            self.body.code,
            self.body.message
        )?;

        for error in &self.body.errors {
            write!(f, ", {}={}", error.field, error.code)?;
        }

        Ok(())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status);

        if let Some(challenge) = &self.www_authenticate {
            response.insert_header((header::WWW_AUTHENTICATE, challenge.clone()));
        }

        response.json(&self.body)
    }
}

impl From<crate::BlockingError> for ApiError {
    fn from(e: crate::BlockingError) -> Self {
        log::error!("Blocking database task failed: {}", e);
        Self::internal()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound => Self::not_found(),
            err if err.is_foreign_key_violation() => Self::conflict(),
            err => {
                log::error!("Database query failed: {}", err);
                Self::internal()
            }
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        DatabaseError::from(err).into()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(validation_errors: ValidationErrors) -> Self {
        let errors = validation_errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field,
                    code: validation_code(&error.code),
                    message: error.message.clone(),
                })
            })
            .collect();

        Self::validation_failed(errors)
    }
}

fn validation_code(code: &str) -> &'static str {
    match code {
        "length" => CODE_INVALID_LENGTH,
        "range" => CODE_OUT_OF_RANGE,
        "required" => CODE_VALUE_REQUIRED,
        _ => CODE_INVALID_VALUE,
    }
}
