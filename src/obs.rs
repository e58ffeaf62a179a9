//! Optional observability helpers for client requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `envelope_client.request` with the `method`
//!   and `path` fields, plus warn-level events from [`TracingNotifier`](crate::presenter::TracingNotifier).
//! - Enable `metrics` to increment the `envelope_client_request_total` counter for every
//!   attempt/success/failure/cancellation, labeled by `method` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to a client call.
	Attempt,
	/// Reply (envelope or no-content) returned to the caller.
	Success,
	/// Error propagated back to the caller.
	Failure,
	/// Caller cancelled the call.
	Cancelled,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
			RequestOutcome::Cancelled => "cancelled",
		}
	}

	/// Classifies a finished call.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => RequestOutcome::Success,
			Err(e) if e.is_cancelled() => RequestOutcome::Cancelled,
			Err(_) => RequestOutcome::Failure,
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
