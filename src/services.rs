//! Feature services built on top of [`ApiClient`](crate::client::ApiClient).

pub mod auth;

pub use auth::*;
