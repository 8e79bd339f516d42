//! # api
//!
//! Typed REST client for the LapakBenz supplier API.
//!
//! Every call goes through [`ApiClient`], which attaches the session
//! credential and turns a 401 into a forced logout plus a redirect to the
//! login view (except on the password-reset/OTP endpoints, whose 401s are
//! ordinary business errors). Service methods for auth, products, orders and
//! locations are `impl ApiClient` blocks in their own modules.

pub mod auth;
pub mod cache;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod feed;
pub mod http;
pub mod locations;
pub mod orders;
pub mod products;
pub mod types;

pub use config::ClientConfig;
pub use endpoint::Endpoint;
pub use error::{ApiError, NormalizedError};
pub use http::ApiClient;
