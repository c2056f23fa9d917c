//! Common types used across the ZB client library.

pub mod common;
pub mod serde_helpers;

pub use common::*;
