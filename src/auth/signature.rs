//! HMAC-MD5 signature generation for ZB trade API authentication.
//!
//! ZB trade endpoints require a `sign` parameter computed as:
//! ```text
//! hex(HMAC-MD5(canonical_query_string, hex(SHA1(secret_key))))
//! ```
//!
//! The canonical query string is every parameter except `sign`, sorted by key
//! and joined as unencoded `key=value` pairs with `&`.

use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::{Digest, Sha1};

use crate::auth::{Credentials, QueryParams};
use crate::error::ZbError;

type HmacMd5 = Hmac<Md5>;

/// Name of the signature parameter.
pub const SIGN_PARAM: &str = "sign";

/// Sign a parameter set with the given secret key.
///
/// # Returns
///
/// Lowercase hex encoded HMAC-MD5 signature.
///
/// # Example
///
/// ```rust
/// use zb_api_client::auth::{QueryParams, sign};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let params = QueryParams::new()
///     .with("accesskey", "AK")
///     .with("method", "getAccountInfo");
/// let signature = sign("SK", &params)?;
/// assert_eq!(signature.len(), 32);
/// # Ok(())
/// # }
/// ```
pub fn sign(secret_key: &str, params: &QueryParams) -> Result<String, ZbError> {
    let payload = unsigned_payload(params);
    sign_payload(&derive_signing_key(secret_key), &payload)
}

/// HMAC key derived from a secret key.
///
/// The key is the hex rendering of the SHA-1 digest, not the raw bytes.
pub(crate) fn derive_signing_key(secret_key: &str) -> String {
    hex::encode(Sha1::digest(secret_key.as_bytes()))
}

fn sign_payload(signing_key: &str, payload: &str) -> Result<String, ZbError> {
    let mut hmac = HmacMd5::new_from_slice(signing_key.as_bytes())
        .map_err(|e| ZbError::Auth(format!("Invalid HMAC key: {e}")))?;
    hmac.update(payload.as_bytes());

    Ok(hex::encode(hmac.finalize().into_bytes()))
}

fn unsigned_payload(params: &QueryParams) -> String {
    if params.contains_key(SIGN_PARAM) {
        let mut unsigned = params.clone();
        unsigned.remove(SIGN_PARAM);
        unsigned.canonical_string()
    } else {
        params.canonical_string()
    }
}

/// Compute the signature for `params` and store it under `sign`.
pub fn sign_params(credentials: &Credentials, params: &mut QueryParams) -> Result<(), ZbError> {
    let signature = sign_payload(credentials.signing_key(), &unsigned_payload(params))?;
    params.insert(SIGN_PARAM, signature);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_params() -> QueryParams {
        QueryParams::new()
            .with("accesskey", "AK")
            .with("method", "getAccountInfo")
    }

    #[test]
    fn test_signature_known_vector() {
        let signature = sign("SK", &account_params()).unwrap();
        assert_eq!(signature, "217f420c1a3358226dc3a38f83326988");
    }

    #[test]
    fn test_signature_of_empty_params() {
        let signature = sign("SK", &QueryParams::new()).unwrap();
        assert_eq!(signature, "f908e141a4dcae70dc97e288370c9929");
    }

    #[test]
    fn test_signature_consistency() {
        let sig1 = sign("my_secret", &account_params()).unwrap();
        let sig2 = sign("my_secret", &account_params()).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_signature_independent_of_insertion_order() {
        let forward = QueryParams::new()
            .with("accesskey", "AK")
            .with("currency", "btc_usdt")
            .with("method", "getOrder")
            .with("id", "42");
        let backward = QueryParams::new()
            .with("id", "42")
            .with("method", "getOrder")
            .with("currency", "btc_usdt")
            .with("accesskey", "AK");
        assert_eq!(sign("SK", &forward).unwrap(), sign("SK", &backward).unwrap());
    }

    #[test]
    fn test_signature_ignores_existing_sign() {
        let mut params = account_params();
        let unsigned = sign("SK", &params).unwrap();
        params.insert(SIGN_PARAM, "stale");
        assert_eq!(sign("SK", &params).unwrap(), unsigned);
    }

    #[test]
    fn test_signature_changes_with_secret() {
        let sig1 = sign("secret_a", &account_params()).unwrap();
        let sig2 = sign("secret_b", &account_params()).unwrap();
        assert_ne!(sig1, sig2);
    }

    #[test]
    fn test_sign_params_inserts_signature() {
        let credentials = Credentials::new("AK", "SK");
        let mut params = account_params();
        sign_params(&credentials, &mut params).unwrap();
        assert_eq!(params.get(SIGN_PARAM), Some("217f420c1a3358226dc3a38f83326988"));
    }
}
