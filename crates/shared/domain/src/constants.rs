//! Names that must agree between the server, the feature slices and the docs.

/// `OpenAPI` tag for health and diagnostics.
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for the public booking endpoints.
pub const BOOKING_TAG: &str = "Booking";
/// `OpenAPI` tag for the password-protected admin endpoints.
pub const ADMIN_TAG: &str = "Admin";

/// Header carrying the shared admin secret.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Prefix of environment variables overriding the server configuration.
pub const ENV_PREFIX: &str = "SLOTBOOK";
/// Separator between nested keys in environment overrides (`SLOTBOOK__BOOKING__ALLOW_RESET`).
pub const ENV_SEPARATOR: &str = "__";

/// Body of every 500 response; details stay in the logs.
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again.";
