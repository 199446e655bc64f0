//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CustomerNotFound
            | Self::DevoteeNotFound
            | Self::BookingNotFound
            | Self::PaymentNotFound
            | Self::HallNotFound
            | Self::BillingItemNotFound
            | Self::DinnerPackageNotFound
            | Self::CateringVendorNotFound
            | Self::QuotationNotFound
            | Self::UserNotFound
            | Self::SettingNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::BookingSlotTaken
            | Self::BookingHasPayments
            | Self::HallNameExists
            | Self::CateringVendorHasPackages
            | Self::QuotationAlreadyConverted
            | Self::UserEmailExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::RoleRequired
            | Self::CannotModifySuperAdmin
            | Self::UserCannotDeleteSelf => StatusCode::FORBIDDEN,

            // 422 Unprocessable Entity (well-formed request violating a business rule)
            Self::BookingCancelled
            | Self::BookingCompleted
            | Self::BookingInvalidStatus
            | Self::BookingTotalBelowPaid
            | Self::PaymentExceedsBalance
            | Self::QuotationExpired
            | Self::QuotationNotAccepted
            | Self::QuotationInvalidStatus => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
