//! Unified error codes for the temple booking system
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Customer / devotee errors
//! - 4xxx: Booking errors
//! - 5xxx: Payment errors
//! - 6xxx: Catalog errors (halls, billing items, dinner packages, vendors)
//! - 7xxx: Quotation errors
//! - 8xxx: Administration errors (users, settings)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,
    /// Password too short
    PasswordTooShort = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Only a super admin may manage super admins
    CannotModifySuperAdmin = 2003,

    // ==================== 3xxx: Customer / Devotee ====================
    /// Customer not found
    CustomerNotFound = 3001,
    /// Devotee not found
    DevoteeNotFound = 3101,

    // ==================== 4xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 4001,
    /// Hall already booked for that date and time slot
    BookingSlotTaken = 4002,
    /// Booking has been cancelled
    BookingCancelled = 4003,
    /// Booking has been completed
    BookingCompleted = 4004,
    /// Booking has recorded payments
    BookingHasPayments = 4005,
    /// Booking status transition not allowed
    BookingInvalidStatus = 4006,
    /// Booking total would drop below the amount already paid
    BookingTotalBelowPaid = 4007,
    /// Event date is in the past
    BookingDateInPast = 4008,

    // ==================== 5xxx: Payment ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Payment exceeds the outstanding balance
    PaymentExceedsBalance = 5002,
    /// Invalid payment method
    PaymentInvalidMethod = 5003,
    /// Invalid payment amount
    PaymentInvalidAmount = 5004,

    // ==================== 6xxx: Catalog ====================
    /// Hall not found
    HallNotFound = 6001,
    /// Hall name already exists
    HallNameExists = 6002,
    /// Hall is not active
    HallInactive = 6003,
    /// Billing item not found
    BillingItemNotFound = 6101,
    /// Dinner package not found
    DinnerPackageNotFound = 6201,
    /// Dinner package is not active
    DinnerPackageInactive = 6202,
    /// Table count below the package minimum
    DinnerPackageBelowMinTables = 6203,
    /// Catering vendor not found
    CateringVendorNotFound = 6301,
    /// Catering vendor still has dinner packages
    CateringVendorHasPackages = 6302,

    // ==================== 7xxx: Quotation ====================
    /// Quotation not found
    QuotationNotFound = 7001,
    /// Quotation has expired
    QuotationExpired = 7002,
    /// Quotation must be accepted first
    QuotationNotAccepted = 7003,
    /// Quotation was already converted to a booking
    QuotationAlreadyConverted = 7004,
    /// Quotation status transition not allowed
    QuotationInvalidStatus = 7005,

    // ==================== 8xxx: Administration ====================
    /// User not found
    UserNotFound = 8001,
    /// User email already exists
    UserEmailExists = 8002,
    /// Cannot delete own account
    UserCannotDeleteSelf = 8003,
    /// System setting not found
    SettingNotFound = 8101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::CannotModifySuperAdmin => "Only a super admin may manage super admins",

            // Customer / Devotee
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::DevoteeNotFound => "Devotee not found",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::BookingSlotTaken => "Hall is already booked for this date and time slot",
            ErrorCode::BookingCancelled => "Booking has been cancelled",
            ErrorCode::BookingCompleted => "Booking has been completed",
            ErrorCode::BookingHasPayments => "Booking has recorded payments",
            ErrorCode::BookingInvalidStatus => "Booking status change is not allowed",
            ErrorCode::BookingTotalBelowPaid => "Booking total cannot be less than the amount paid",
            ErrorCode::BookingDateInPast => "Event date cannot be in the past",

            // Payment
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::PaymentExceedsBalance => "Payment exceeds the outstanding balance",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentInvalidAmount => "Payment amount must be greater than zero",

            // Catalog
            ErrorCode::HallNotFound => "Hall not found",
            ErrorCode::HallNameExists => "Hall name already exists",
            ErrorCode::HallInactive => "Hall is not active",
            ErrorCode::BillingItemNotFound => "Billing item not found",
            ErrorCode::DinnerPackageNotFound => "Dinner package not found",
            ErrorCode::DinnerPackageInactive => "Dinner package is not active",
            ErrorCode::DinnerPackageBelowMinTables => {
                "Table count is below the dinner package minimum"
            }
            ErrorCode::CateringVendorNotFound => "Catering vendor not found",
            ErrorCode::CateringVendorHasPackages => "Catering vendor has dinner packages",

            // Quotation
            ErrorCode::QuotationNotFound => "Quotation not found",
            ErrorCode::QuotationExpired => "Quotation has expired",
            ErrorCode::QuotationNotAccepted => "Quotation must be accepted before conversion",
            ErrorCode::QuotationAlreadyConverted => "Quotation has already been converted",
            ErrorCode::QuotationInvalidStatus => "Quotation status change is not allowed",

            // Administration
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserEmailExists => "Email is already registered",
            ErrorCode::UserCannotDeleteSelf => "Cannot delete own account",
            ErrorCode::SettingNotFound => "Setting not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),
            1006 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::CannotModifySuperAdmin),

            // Customer / Devotee
            3001 => Ok(ErrorCode::CustomerNotFound),
            3101 => Ok(ErrorCode::DevoteeNotFound),

            // Booking
            4001 => Ok(ErrorCode::BookingNotFound),
            4002 => Ok(ErrorCode::BookingSlotTaken),
            4003 => Ok(ErrorCode::BookingCancelled),
            4004 => Ok(ErrorCode::BookingCompleted),
            4005 => Ok(ErrorCode::BookingHasPayments),
            4006 => Ok(ErrorCode::BookingInvalidStatus),
            4007 => Ok(ErrorCode::BookingTotalBelowPaid),
            4008 => Ok(ErrorCode::BookingDateInPast),

            // Payment
            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::PaymentExceedsBalance),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),
            5004 => Ok(ErrorCode::PaymentInvalidAmount),

            // Catalog
            6001 => Ok(ErrorCode::HallNotFound),
            6002 => Ok(ErrorCode::HallNameExists),
            6003 => Ok(ErrorCode::HallInactive),
            6101 => Ok(ErrorCode::BillingItemNotFound),
            6201 => Ok(ErrorCode::DinnerPackageNotFound),
            6202 => Ok(ErrorCode::DinnerPackageInactive),
            6203 => Ok(ErrorCode::DinnerPackageBelowMinTables),
            6301 => Ok(ErrorCode::CateringVendorNotFound),
            6302 => Ok(ErrorCode::CateringVendorHasPackages),

            // Quotation
            7001 => Ok(ErrorCode::QuotationNotFound),
            7002 => Ok(ErrorCode::QuotationExpired),
            7003 => Ok(ErrorCode::QuotationNotAccepted),
            7004 => Ok(ErrorCode::QuotationAlreadyConverted),
            7005 => Ok(ErrorCode::QuotationInvalidStatus),

            // Administration
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UserEmailExists),
            8003 => Ok(ErrorCode::UserCannotDeleteSelf),
            8101 => Ok(ErrorCode::SettingNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);

        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::CustomerNotFound.code(), 3001);
        assert_eq!(ErrorCode::BookingSlotTaken.code(), 4002);
        assert_eq!(ErrorCode::PaymentExceedsBalance.code(), 5002);
        assert_eq!(ErrorCode::HallNameExists.code(), 6002);
        assert_eq!(ErrorCode::QuotationExpired.code(), 7002);
        assert_eq!(ErrorCode::UserEmailExists.code(), 8002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    /// Every code must survive `u16 -> ErrorCode`; a missing arm in
    /// `try_from` would break deserialization of API error bodies.
    #[test]
    fn test_try_from_covers_all_codes() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidFormat,
            ErrorCode::RequiredField,
            ErrorCode::ValueOutOfRange,
            ErrorCode::NotAuthenticated,
            ErrorCode::InvalidCredentials,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::AccountDisabled,
            ErrorCode::PasswordTooShort,
            ErrorCode::PermissionDenied,
            ErrorCode::RoleRequired,
            ErrorCode::CannotModifySuperAdmin,
            ErrorCode::CustomerNotFound,
            ErrorCode::DevoteeNotFound,
            ErrorCode::BookingNotFound,
            ErrorCode::BookingSlotTaken,
            ErrorCode::BookingCancelled,
            ErrorCode::BookingCompleted,
            ErrorCode::BookingHasPayments,
            ErrorCode::BookingInvalidStatus,
            ErrorCode::BookingTotalBelowPaid,
            ErrorCode::BookingDateInPast,
            ErrorCode::PaymentNotFound,
            ErrorCode::PaymentExceedsBalance,
            ErrorCode::PaymentInvalidMethod,
            ErrorCode::PaymentInvalidAmount,
            ErrorCode::HallNotFound,
            ErrorCode::HallNameExists,
            ErrorCode::HallInactive,
            ErrorCode::BillingItemNotFound,
            ErrorCode::DinnerPackageNotFound,
            ErrorCode::DinnerPackageInactive,
            ErrorCode::DinnerPackageBelowMinTables,
            ErrorCode::CateringVendorNotFound,
            ErrorCode::CateringVendorHasPackages,
            ErrorCode::QuotationNotFound,
            ErrorCode::QuotationExpired,
            ErrorCode::QuotationNotAccepted,
            ErrorCode::QuotationAlreadyConverted,
            ErrorCode::QuotationInvalidStatus,
            ErrorCode::UserNotFound,
            ErrorCode::UserEmailExists,
            ErrorCode::UserCannotDeleteSelf,
            ErrorCode::SettingNotFound,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::ConfigError,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::BookingSlotTaken).unwrap(),
            "4002"
        );

        let code: ErrorCode = serde_json::from_str("7002").unwrap();
        assert_eq!(code, ErrorCode::QuotationExpired);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::BookingNotFound), "4001");
        assert_eq!(ErrorCode::BookingNotFound.message(), "Booking not found");
        assert_eq!(
            format!("{}", InvalidErrorCode(999)),
            "invalid error code: 999"
        );
    }
}
