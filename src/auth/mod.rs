//! Authentication module for the ZB trade API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - A request clock that stamps `reqTime` on signed requests
//! - Canonical query parameters and HMAC-MD5 request signing

mod clock;
mod credentials;
mod params;
mod signature;

pub use clock::{FixedClock, RequestClock, SystemClock};
pub use credentials::{Credentials, CredentialsProvider, EnvCredentials, StaticCredentials};
pub use params::QueryParams;
pub use signature::{SIGN_PARAM, sign, sign_params};
