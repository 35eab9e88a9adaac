use crate::error::ReportingError;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use slotbook_booking::{Booking, EventSettings};
use slotbook_kernel::domain::constants::ADMIN_PASSWORD_HEADER;
use slotbook_kernel::security::secret::SharedSecret;
use slotbook_kernel::server::ApiState;

/// Checks the shared admin password header against the configured one.
///
/// # Errors
/// Returns [`ReportingError::Unauthorized`] when the header is absent, not UTF-8 or
/// wrong, and when no admin password is configured.
pub fn verify(headers: &HeaderMap, settings: &EventSettings) -> Result<(), ReportingError> {
    let provided = headers.get(ADMIN_PASSWORD_HEADER).and_then(|v| v.to_str().ok());
    if SharedSecret::verify(provided, &settings.admin_password) {
        Ok(())
    } else {
        let reason = if provided.is_none() { "header missing" } else { "password mismatch" };
        Err(ReportingError::Unauthorized { context: Some(reason.into()) })
    }
}

/// Extractor proving the caller knows the admin password.
///
/// Carries the settings it was checked against, so handlers need not read them again.
#[derive(Debug)]
pub struct AdminAccess {
    pub settings: EventSettings,
    pub booking: Booking,
}

impl FromRequestParts<ApiState> for AdminAccess {
    type Rejection = ReportingError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let booking = state.try_get_slice::<Booking>()?.clone();
        let settings = booking.settings.get().await;
        verify(&parts.headers, &settings)?;
        Ok(Self { settings, booking })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn settings(password: &str) -> EventSettings {
        EventSettings { admin_password: password.into(), ..EventSettings::default() }
    }

    fn headers(password: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_PASSWORD_HEADER, HeaderValue::from_str(password).unwrap());
        headers
    }

    #[test]
    fn matching_password_passes() {
        assert!(verify(&headers("s3cret"), &settings("s3cret")).is_ok());
    }

    #[test]
    fn everything_else_is_refused() {
        assert!(verify(&HeaderMap::new(), &settings("s3cret")).is_err());
        assert!(verify(&headers("S3CRET"), &settings("s3cret")).is_err());
        assert!(verify(&headers(""), &settings("")).is_err());
        assert!(verify(&HeaderMap::new(), &settings("")).is_err());
    }

    #[test]
    fn configured_whitespace_is_significant() {
        let settings = EventSettings::from_value(&serde_json::json!({ "adminPassword": " pw " }));
        assert!(verify(&headers("pw"), &settings).is_err());
    }
}
