use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::auth::errors::{AuthError, ValidationError};
use crate::domain::auth::value_objects::ValueObjectError;
use crate::domain::portfolio::errors::PortfolioError;
use crate::domain::portfolio::value_objects::Locale;

use super::dtos::ErrorResponse;
use super::i18n::Message;

/// Field the login form reports credential and throttle failures under
pub const LOGIN_FIELD: &str = "email";

/// Messages per request field
pub type FieldErrors = BTreeMap<String, Vec<Message>>;

/// What went wrong, independent of the language it is reported in
#[derive(Debug)]
pub enum ApiErrorKind {
  /// Invalid request input (422 Unprocessable Entity)
  Validation(FieldErrors),

  /// Authentication error (401, 403, 422 or 429)
  Auth(AuthErrorKind),

  /// Missing resource (404 Not Found)
  NotFound(Message),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  /// Unknown identifier, wrong password or not an admin (422)
  InvalidCredentials,

  /// Too many failed attempts (429)
  RateLimited { available_in: u64 },

  /// Missing, unknown or expired bearer token (401)
  Unauthenticated,

  /// Token or identity lacks admin rights (403)
  Forbidden,
}

/// API error type that maps domain errors to localized HTTP responses
#[derive(Debug)]
pub struct ApiError {
  kind: ApiErrorKind,
  locale: Locale,
}

impl ApiError {
  pub fn new(kind: ApiErrorKind) -> Self {
    Self {
      kind,
      locale: Locale::default(),
    }
  }

  /// Reports the error in `locale`
  pub fn localized(mut self, locale: Locale) -> Self {
    self.locale = locale;
    self
  }

  pub fn kind(&self) -> &ApiErrorKind {
    &self.kind
  }

  pub fn field(field: &str, message: Message) -> Self {
    Self::new(ApiErrorKind::Validation(single_field(field, message)))
  }

  fn render_fields(&self, errors: &FieldErrors) -> serde_json::Value {
    let rendered: BTreeMap<&str, Vec<String>> = errors
      .iter()
      .map(|(field, messages)| {
        (
          field.as_str(),
          messages.iter().map(|m| m.render(self.locale)).collect(),
        )
      })
      .collect();

    json!(rendered)
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      ApiErrorKind::Validation(errors) => write!(
        f,
        "Validation error on: {}",
        errors.keys().cloned().collect::<Vec<_>>().join(", ")
      ),
      ApiErrorKind::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiErrorKind::NotFound(message) => write!(f, "Not found: {:?}", message),
      ApiErrorKind::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

fn single_field(field: &str, message: Message) -> FieldErrors {
  let mut errors = FieldErrors::new();
  errors.insert(field.to_string(), vec![message]);
  errors
}

fn required(field: &str) -> ApiErrorKind {
  ApiErrorKind::Validation(single_field(
    field,
    Message::FieldRequired {
      field: field.to_string(),
    },
  ))
}

/// Whole minutes until a throttle window clears, rounded up
fn minutes_for(seconds: u64) -> u64 {
  seconds.div_ceil(60)
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match &self.kind {
      ApiErrorKind::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiErrorKind::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => StatusCode::UNPROCESSABLE_ENTITY,
        AuthErrorKind::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        AuthErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        AuthErrorKind::Forbidden => StatusCode::FORBIDDEN,
      },
      ApiErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
      ApiErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let mut builder = HttpResponse::build(status);

    let (error_type, message, details) = match &self.kind {
      ApiErrorKind::Validation(errors) => {
        let message = errors
          .values()
          .flatten()
          .next()
          .map(|m| m.render(self.locale))
          .unwrap_or_default();
        (
          "validation_error",
          message,
          Some(json!({ "errors": self.render_fields(errors) })),
        )
      }
      ApiErrorKind::Auth(kind) => match *kind {
        AuthErrorKind::InvalidCredentials => {
          let message = Message::InvalidCredentials.render(self.locale);
          (
            "invalid_credentials",
            message.clone(),
            Some(json!({ "errors": { LOGIN_FIELD: [message] } })),
          )
        }
        AuthErrorKind::RateLimited { available_in } => {
          builder.insert_header(("Retry-After", available_in.to_string()));
          let message = Message::Throttled {
            seconds: available_in,
          }
          .render(self.locale);
          (
            "rate_limit_exceeded",
            message.clone(),
            Some(json!({
              "errors": { LOGIN_FIELD: [message] },
              "retry_after": available_in,
              "minutes": minutes_for(available_in),
            })),
          )
        }
        AuthErrorKind::Unauthenticated => (
          "unauthenticated",
          Message::Unauthenticated.render(self.locale),
          None,
        ),
        AuthErrorKind::Forbidden => ("forbidden", Message::Forbidden.render(self.locale), None),
      },
      ApiErrorKind::NotFound(message) => ("not_found", message.render(self.locale), None),
      ApiErrorKind::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        ("internal_error", Message::Internal.render(self.locale), None)
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details,
    };

    builder
      .insert_header(("Content-Language", self.locale.code()))
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    let kind = match error {
      AuthError::InvalidCredentials => ApiErrorKind::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::RateLimited { available_in } => {
        ApiErrorKind::Auth(AuthErrorKind::RateLimited { available_in })
      }
      AuthError::Unauthenticated => ApiErrorKind::Auth(AuthErrorKind::Unauthenticated),
      AuthError::Forbidden => ApiErrorKind::Auth(AuthErrorKind::Forbidden),
      AuthError::ValueObject(err) => match err {
        ValueObjectError::EmptyIdentifier => required(LOGIN_FIELD),
        ValueObjectError::EmptyPassword => required("password"),
        ValueObjectError::InvalidToken => ApiErrorKind::Auth(AuthErrorKind::Unauthenticated),
        other => ApiErrorKind::Internal(other.to_string()),
      },
      AuthError::Validation(err) => match err {
        ValidationError::MissingField { field } => required(&field),
        ValidationError::InvalidField { field } => {
          let message = Message::FieldInvalid {
            field: field.clone(),
          };
          ApiErrorKind::Validation(single_field(&field, message))
        }
      },
      AuthError::Repository(err) => ApiErrorKind::Internal(err.to_string()),
      AuthError::Hash(err) => ApiErrorKind::Internal(err.to_string()),
    };

    ApiError::new(kind)
  }
}

/// Convert PortfolioError to ApiError
impl From<PortfolioError> for ApiError {
  fn from(error: PortfolioError) -> Self {
    let kind = match error {
      PortfolioError::ProjectNotFound(_) => ApiErrorKind::NotFound(Message::ProjectNotFound),
      PortfolioError::Repository(err) => ApiErrorKind::Internal(err.to_string()),
    };

    ApiError::new(kind)
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let fields: FieldErrors = errors
      .field_errors()
      .iter()
      .map(|(field, errors)| {
        let messages = errors
          .iter()
          .map(|error| match &*error.code {
            "email" => Message::InvalidEmail,
            _ => Message::FieldRequired {
              field: field.to_string(),
            },
          })
          .collect();
        (field.to_string(), messages)
      })
      .collect();

    ApiError::new(ApiErrorKind::Validation(fields))
  }
}

/// Attaches the request locale to any error convertible into `ApiError`
pub trait LocalizeErr<T> {
  fn localize_err(self, locale: Locale) -> Result<T, ApiError>;
}

impl<T, E> LocalizeErr<T> for Result<T, E>
where
  E: Into<ApiError>,
{
  fn localize_err(self, locale: Locale) -> Result<T, ApiError> {
    self.map_err(|e| e.into().localized(locale))
  }
}
