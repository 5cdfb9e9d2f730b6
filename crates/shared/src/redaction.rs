//! Secret detection and redaction utilities.
//!
//! The insert key is the one credential this workspace handles. It is carried
//! as a [`SecretString`] so it never leaks through `Debug`/`Display`, and log
//! and metadata writers consult [`is_secret_key`] before emitting a field.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Number of trailing characters revealed by [`SecretString::masked`].
const MASK_VISIBLE_SUFFIX: usize = 4;

/// Checks if a key/variable name likely refers to a secret.
///
/// # Examples
///
/// ```
/// use mlpm_shared::is_secret_key;
///
/// assert!(is_secret_key("insertKey"));
/// assert!(is_secret_key("MLPM_INSERT_KEY"));
/// assert!(is_secret_key("password"));
/// assert!(!is_secret_key("modelName"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    ["KEY", "TOKEN", "SECRET", "PASSWORD", "CREDENTIAL", "AUTH"]
        .iter()
        .any(|needle| key.contains(needle))
}

/// Redacts a value if the key is likely a secret.
///
/// ```
/// use mlpm_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("MLPM_INSERT_KEY", "NRII-abc"), "[REDACTED]");
/// assert_eq!(redact_if_secret("MLPM_MODEL_NAME", "iris"), "iris");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}

/// A secret string wrapper that redacts on Display/Debug.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SecretString(Box<str>);

impl SecretString {
    /// Wrap a secret value.
    pub fn new(value: impl Into<Box<str>>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true when the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the secret with everything but the last four characters hidden.
    ///
    /// Secrets of four characters or fewer are fully hidden.
    ///
    /// ```
    /// use mlpm_shared::SecretString;
    ///
    /// let key = SecretString::new("NRII-0123456789");
    /// assert_eq!(key.masked(), "***********6789");
    /// assert_eq!(SecretString::new("abc").masked(), "***");
    /// ```
    pub fn masked(&self) -> String {
        let total = self.0.chars().count();
        if total <= MASK_VISIBLE_SUFFIX {
            return "*".repeat(total);
        }
        let hidden = total - MASK_VISIBLE_SUFFIX;
        let suffix: String = self.0.chars().skip(hidden).collect();
        format!("{}{suffix}", "*".repeat(hidden))
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value.into_boxed_str())
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}
