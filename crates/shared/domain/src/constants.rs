//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Service Status
// =============================================================================

/// Status assigned to newly created services
pub const STATUS_PENDING: &str = "pending";

/// Service has been carried out
pub const STATUS_COMPLETED: &str = "completed";

/// Service was called off
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid status values
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_COMPLETED, STATUS_CANCELLED];

/// Check if a status value is valid
pub fn is_valid_status(status: &str) -> bool {
    VALID_STATUSES.contains(&status)
}

// =============================================================================
// Validation
// =============================================================================

/// Minimum length of customer name and service type
pub const MIN_TEXT_LENGTH: u64 = 1;

/// Maximum length of customer name and service type (column width)
pub const MAX_TEXT_LENGTH: u64 = 255;

/// Decimal places kept for prices
pub const PRICE_SCALE: u32 = 2;

/// Smallest price that survives rounding to the column scale
pub const MIN_PRICE: f64 = 0.01;

/// Largest price a DECIMAL(10,2) column holds
pub const MAX_PRICE: f64 = 99_999_999.99;
