use subtle::ConstantTimeEq;

/// Shared-secret comparison for the admin endpoints.
#[derive(Debug)]
pub struct SharedSecret;

impl SharedSecret {
    /// Returns `true` only when a secret is configured and the caller supplied exactly it.
    ///
    /// An empty configured secret disables access altogether. The byte comparison runs
    /// in constant time so response timing does not reveal a matching prefix.
    ///
    /// # Example
    /// ```rust
    /// use slotbook_kernel::security::secret::SharedSecret;
    ///
    /// assert!(SharedSecret::verify(Some("s3cret"), "s3cret"));
    /// assert!(!SharedSecret::verify(Some("s3cre"), "s3cret"));
    /// assert!(!SharedSecret::verify(Some(""), ""));
    /// ```
    #[must_use]
    pub fn verify(provided: Option<&str>, expected: &str) -> bool {
        let Some(provided) = provided else {
            return false;
        };
        if expected.is_empty() {
            return false;
        }
        provided.as_bytes().ct_eq(expected.as_bytes()).into()
    }
}
