//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding. All route handlers return `Result<T, AppError>`,
//! so the view layer always gets a deterministic status + message pair -
//! nothing in the core crosses the boundary as an uncaught panic.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::CartError;
use crate::services::{CheckoutError, FollowError, ReviewError};

/// Application-level error type for the marketplace.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request needs an authenticated identity.
    #[error("Authentication required")]
    AuthRequired,

    /// Checkout was attempted with an empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Malformed or invalid request (self-follow, bad quantity, missing seller).
    #[error("Bad request: {0}")]
    InvalidRequest(String),

    /// Referenced entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A cart mutation was rejected; the cart is unchanged.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// Storage failed; safe to retry the whole operation.
    #[error("Storage error: {0}")]
    Persistence(#[from] RepositoryError),

    /// The session record could not be written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Some seller orders were created, some were not.
    #[error("{created} of {attempted} seller orders were created")]
    PartialCheckout { created: usize, attempted: usize },

    /// The review assistant is not configured.
    #[error("Review suggestions are not available")]
    ReviewUnavailable,

    /// The review assistant call failed.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => Self::EmptyCart,
            CheckoutError::MissingSeller { .. } => Self::InvalidRequest(err.to_string()),
            CheckoutError::Store(e) => Self::Persistence(e),
            CheckoutError::Partial {
                created,
                failed_sellers,
                ..
            } => Self::PartialCheckout {
                attempted: created.len() + failed_sellers,
                created: created.len(),
            },
        }
    }
}

impl From<FollowError> for AppError {
    fn from(err: FollowError) -> Self {
        match err {
            FollowError::SelfFollow => Self::InvalidRequest(err.to_string()),
            FollowError::ArtisanNotFound(id) => Self::NotFound(format!("artisan {id}")),
            FollowError::Store(e) => Self::Persistence(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side errors to Sentry
        if matches!(
            self,
            Self::Persistence(_) | Self::Session(_) | Self::PartialCheckout { .. }
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::EmptyCart | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Cart(err) => match err {
                CartError::UnknownProduct { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Session(_) | Self::PartialCheckout { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ReviewUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Review(_) => StatusCode::BAD_GATEWAY,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Persistence(_) => {
                "A storage error occurred; nothing was recorded. Please try again.".to_string()
            }
            Self::Session(_) => {
                "Your change was applied but could not be saved to the session.".to_string()
            }
            Self::PartialCheckout { created, attempted } => format!(
                "{created} of {attempted} seller orders were created. Review your orders \
                 before retrying - retrying the whole checkout would duplicate them."
            ),
            Self::Review(_) => "The review assistant is temporarily unavailable".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("artisan 3".to_string());
        assert_eq!(err.to_string(), "Not found: artisan 3");

        let err = AppError::InvalidRequest("you cannot follow yourself".to_string());
        assert_eq!(err.to_string(), "Bad request: you cannot follow yourself");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::AuthRequired), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AppError::EmptyCart), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::InvalidRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::ReviewUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::PartialCheckout {
                created: 1,
                attempted: 2
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_partial_checkout_message_reports_counts() {
        let response = AppError::PartialCheckout {
            created: 2,
            attempted: 3,
        };
        assert_eq!(
            response.to_string(),
            "2 of 3 seller orders were created"
        );
    }

    #[test]
    fn test_stock_rejection_maps_to_unprocessable() {
        let err = AppError::Cart(CartError::InvalidQuantity);
        assert_eq!(get_status(err), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
