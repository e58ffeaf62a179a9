//! Cooperative cancellation for in-flight requests.
//!
//! A [`CancelSignal`] is created by the caller, attached to one or more requests through
//! [`RequestConfig::signal`](crate::request::RequestConfig::signal), and fired with
//! [`CancelSignal::cancel`]. The client never polls the flag; it races the transport future
//! against [`CancelSignal::cancelled`] and drops the transport future once the signal fires.

// crates.io
use tokio::sync::watch;
// self
use crate::_prelude::*;

/// Cloneable, idempotent cancellation flag.
#[derive(Clone, Debug)]
pub struct CancelSignal(Arc<watch::Sender<bool>>);
impl CancelSignal {
	/// Creates an armed (not yet cancelled) signal.
	pub fn new() -> Self {
		let (tx, _) = watch::channel(false);

		Self(Arc::new(tx))
	}

	/// Fires the signal. Calling it more than once has no further effect.
	pub fn cancel(&self) {
		self.0.send_replace(true);
	}

	/// Whether [`cancel`](Self::cancel) has been called on any clone.
	pub fn is_cancelled(&self) -> bool {
		*self.0.borrow()
	}

	/// Resolves once the signal fires; immediately if it already has.
	pub async fn cancelled(&self) {
		let mut rx = self.0.subscribe();

		// The sender outlives `rx` because `self` holds it, so this only returns on cancel.
		let _ = rx.wait_for(|cancelled| *cancelled).await;
	}
}
impl Default for CancelSignal {
	fn default() -> Self {
		Self::new()
	}
}
