//! ZB API keys.
//!
//! The trade API never sees the secret key itself. Requests are signed with a
//! key derived from it, so [`Credentials`] derives that key once on
//! construction and keeps only the derived form.

use secrecy::{ExposeSecret, SecretString};

use crate::auth::signature::derive_signing_key;
use crate::error::ZbError;

/// Environment variable holding the access key.
pub const ACCESS_KEY_VAR: &str = "ZB_ACCESS_KEY";
/// Environment variable holding the secret key.
pub const SECRET_KEY_VAR: &str = "ZB_SECRET_KEY";

/// A ZB access key together with the signing key derived from its secret.
#[derive(Clone)]
pub struct Credentials {
    /// Sent in clear as the `accesskey` parameter.
    pub access_key: String,
    signing_key: SecretString,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl AsRef<str>) -> Self {
        Self {
            access_key: access_key.into(),
            signing_key: SecretString::from(derive_signing_key(secret_key.as_ref())),
        }
    }

    /// HMAC key for request signatures.
    pub(crate) fn signing_key(&self) -> &str {
        self.signing_key.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

/// Source of the credentials used by trade endpoints.
///
/// The REST client asks for credentials each time it builds a signed request,
/// so an implementation may rotate keys behind a shared handle.
pub trait CredentialsProvider: Send + Sync {
    fn get_credentials(&self) -> &Credentials;
}

/// Fixed credentials supplied in code.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl AsRef<str>) -> Self {
        Self {
            credentials: Credentials::new(access_key, secret_key),
        }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Credentials read from `ZB_ACCESS_KEY` and `ZB_SECRET_KEY`.
///
/// Unset or blank variables count as missing.
#[derive(Debug)]
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Read the default variables, or `None` if either is missing.
    pub fn try_from_env() -> Option<Self> {
        Self::try_from_env_vars(ACCESS_KEY_VAR, SECRET_KEY_VAR)
    }

    /// Read the default variables, failing with [`ZbError::MissingCredentials`].
    pub fn from_env() -> Result<Self, ZbError> {
        Self::try_from_env().ok_or(ZbError::MissingCredentials)
    }

    /// Read custom variable names.
    pub fn try_from_env_vars(access_var: &str, secret_var: &str) -> Option<Self> {
        let access_key = non_blank_var(access_var)?;
        let secret_key = non_blank_var(secret_var)?;
        Some(Self {
            credentials: Credentials::new(access_key, secret_key),
        })
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_key_material() {
        let creds = Credentials::new("AK", "super_secret");
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("AK"));
        assert!(!debug_str.contains("super_secret"));
        assert!(!debug_str.contains(creds.signing_key()));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_signing_key_is_sha1_hex_of_secret() {
        let creds = Credentials::new("AK", "SK");
        assert_eq!(creds.signing_key(), "8f15af5eb518056ac0712bb85c82227a0075d1c9");
    }

    #[test]
    fn test_static_credentials() {
        let provider = StaticCredentials::new("AK", "SK");
        let creds = provider.get_credentials();
        assert_eq!(creds.access_key, "AK");
        assert_eq!(creds.signing_key().len(), 40);
    }

    #[test]
    fn test_env_credentials_missing_vars() {
        let creds = EnvCredentials::try_from_env_vars(
            "ZB_TEST_UNSET_ACCESS_KEY_VAR",
            "ZB_TEST_UNSET_SECRET_KEY_VAR",
        );
        assert!(creds.is_none());
    }

    #[test]
    fn test_env_credentials_blank_value_is_missing() {
        // SAFETY: the variable names are unique to this test.
        unsafe {
            std::env::set_var("ZB_TEST_BLANK_ACCESS_KEY", "AK");
            std::env::set_var("ZB_TEST_BLANK_SECRET_KEY", "   ");
        }
        let creds =
            EnvCredentials::try_from_env_vars("ZB_TEST_BLANK_ACCESS_KEY", "ZB_TEST_BLANK_SECRET_KEY");
        assert!(creds.is_none());
    }

    #[test]
    fn test_env_credentials_trims_values() {
        // SAFETY: the variable names are unique to this test.
        unsafe {
            std::env::set_var("ZB_TEST_PADDED_ACCESS_KEY", " AK\n");
            std::env::set_var("ZB_TEST_PADDED_SECRET_KEY", "SK\n");
        }
        let provider =
            EnvCredentials::try_from_env_vars("ZB_TEST_PADDED_ACCESS_KEY", "ZB_TEST_PADDED_SECRET_KEY")
                .unwrap();
        let creds = provider.get_credentials();
        assert_eq!(creds.access_key, "AK");
        assert_eq!(creds.signing_key(), Credentials::new("AK", "SK").signing_key());
    }
}
