//! Token suppliers consulted by the client before every request.
//!
//! The client receives its supplier at construction time and calls
//! [`TokenSupplier::token`] once per request. Suppliers returning `None` (or an empty
//! secret) leave the `Authorization` header off entirely.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Accessor for the credential attached to outbound requests.
pub trait TokenSupplier
where
	Self: Send + Sync,
{
	/// Returns the current token, if any.
	fn token(&self) -> Option<TokenSecret>;
}
impl<F> TokenSupplier for F
where
	F: Send + Sync + Fn() -> Option<String>,
{
	fn token(&self) -> Option<TokenSecret> {
		self().map(TokenSecret::new)
	}
}

/// Supplier for anonymous clients; never yields a token.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoToken;
impl TokenSupplier for NoToken {
	fn token(&self) -> Option<TokenSecret> {
		None
	}
}

/// Supplier returning the same token for the lifetime of the client.
#[derive(Clone, Debug)]
pub struct StaticToken(TokenSecret);
impl StaticToken {
	/// Wraps a fixed token.
	pub fn new(token: impl Into<TokenSecret>) -> Self {
		Self(token.into())
	}
}
impl TokenSupplier for StaticToken {
	fn token(&self) -> Option<TokenSecret> {
		Some(self.0.clone())
	}
}

/// Rotatable supplier shared between the client and whoever manages the session.
///
/// Clones share one slot, so replacing the token through any handle is observed by
/// every client holding another clone on its next request.
#[derive(Clone, Debug, Default)]
pub struct SharedToken(Arc<RwLock<Option<TokenSecret>>>);
impl SharedToken {
	/// Creates a slot holding `token`.
	pub fn new(token: impl Into<TokenSecret>) -> Self {
		Self(Arc::new(RwLock::new(Some(token.into()))))
	}

	/// Swaps in a new token, returning the previous one.
	pub fn replace(&self, token: impl Into<TokenSecret>) -> Option<TokenSecret> {
		self.0.write().replace(token.into())
	}

	/// Drops the current token (e.g. on logout), returning it.
	pub fn clear(&self) -> Option<TokenSecret> {
		self.0.write().take()
	}

	/// Whether a token is currently stored.
	pub fn is_set(&self) -> bool {
		self.0.read().is_some()
	}
}
impl TokenSupplier for SharedToken {
	fn token(&self) -> Option<TokenSecret> {
		self.0.read().clone()
	}
}
