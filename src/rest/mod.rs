//! ZB REST API client.
//!
//! Public market data is served by the data API, account and order operations
//! by the signed trade API.
//!
//! # Trait-based API
//!
//! The [`ZbClient`] trait abstracts all REST operations:
//!
//! ```rust,ignore
//! use zb_api_client::rest::{ZbClient, ZbRestClient};
//!
//! async fn use_client<C: ZbClient>(client: &C) -> Result<(), zb_api_client::ZbError> {
//!     let depth = client.get_depth("btc_usdt", 5).await?;
//!     println!("Best ask: {:?}", depth.asks.last());
//!     Ok(())
//! }
//! ```

mod client;
mod endpoints;
pub mod private;
pub mod public;
mod request;
mod traits;

pub use client::{ZbRestClient, ZbRestClientBuilder};
pub use endpoints::*;
pub use request::{ApiFamily, REQ_TIME_PARAM, RequestBuilder, RestRequest};
pub use traits::ZbClient;
