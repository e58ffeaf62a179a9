//! Turns caught errors into user-facing messages and notifications.
//!
//! Resolution order for [`error_message`]:
//!
//! 1. [`ApiError`]: its own message, else the per-status default, else the caller fallback, else
//!    [`FALLBACK_MESSAGE`].
//! 2. Cancellation: [`CANCELLED_MESSAGE`].
//! 3. Unreachable network: [`NETWORK_MESSAGE`].
//! 4. Anything else: the error's display text, else the caller fallback, else
//!    [`FALLBACK_MESSAGE`].

pub mod notifier;

pub use notifier::*;

// self
use crate::{
	_prelude::*,
	error::{ApiError, TransportError},
};

/// Last-resort message when nothing more specific is known.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";
/// Message shown when the caller cancelled the request.
pub const CANCELLED_MESSAGE: &str = "Request was cancelled.";
/// Message shown when the API host could not be reached.
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection.";
/// Placeholder for a field whose validation message list is empty.
pub const INVALID_VALUE_MESSAGE: &str = "Invalid value";

/// Default user-facing message for well-known HTTP statuses.
pub const fn status_message(status: u16) -> Option<&'static str> {
	Some(match status {
		400 => "Invalid request. Please check your input.",
		401 => "Session expired. Please log in again.",
		403 => "You do not have permission to perform this action.",
		404 => "The requested resource was not found.",
		408 => "Request timed out. Please try again.",
		409 => "A conflict occurred. The resource may have been modified.",
		422 => "Validation failed. Please correct the highlighted fields.",
		429 => "Too many requests. Please wait a moment and try again.",
		500 => "An unexpected server error occurred. Please try again later.",
		502 => "Server is temporarily unavailable. Please try again later.",
		503 => "Service is under maintenance. Please try again later.",
		_ => return None,
	})
}

/// Resolves the user-facing message for any caught error.
pub fn error_message(error: &(dyn StdError + 'static), fallback: Option<&str>) -> String {
	let fallback = || fallback.filter(|f| !f.is_empty()).unwrap_or(FALLBACK_MESSAGE).to_owned();

	if let Some(api) = find_api_error(error) {
		return if !api.message.is_empty() {
			api.message.clone()
		} else {
			status_message(api.status_code).map(str::to_owned).unwrap_or_else(fallback)
		};
	}
	if matches!(error.downcast_ref::<Error>(), Some(Error::Cancelled)) {
		return CANCELLED_MESSAGE.to_owned();
	}
	if is_network(error) {
		return NETWORK_MESSAGE.to_owned();
	}

	let message = error.to_string();

	if message.is_empty() { fallback() } else { message }
}

/// Flattens field errors into `field -> first message`.
pub fn validation_errors(error: &ApiError) -> BTreeMap<String, String> {
	error
		.errors
		.iter()
		.flatten()
		.map(|(field, messages)| {
			let first = messages.first().map(String::as_str).unwrap_or(INVALID_VALUE_MESSAGE);

			(field.clone(), first.to_owned())
		})
		.collect()
}

/// Presents errors to the user through a [`Notifier`].
#[derive(Clone, Debug, Default)]
pub struct ErrorPresenter<N = TracingNotifier>
where
	N: Notifier,
{
	/// Sink receiving one notification per presented error.
	pub notifier: N,
}
impl<N> ErrorPresenter<N>
where
	N: Notifier,
{
	/// Creates a presenter that notifies through `notifier`.
	pub fn new(notifier: N) -> Self {
		Self { notifier }
	}

	/// Resolves the message without notifying anyone.
	pub fn message(&self, error: &(dyn StdError + 'static), fallback: Option<&str>) -> String {
		error_message(error, fallback)
	}

	/// Notifies the user exactly once and returns the typed API error, if `error` is one.
	///
	/// Callers use the returned [`ApiError`] for follow-up handling such as mapping
	/// [`validation_errors`] onto form fields.
	pub fn present(
		&self,
		error: &(dyn StdError + 'static),
		fallback: Option<&str>,
	) -> Option<ApiError> {
		let message = error_message(error, fallback);

		self.notifier.notify_error(&message);

		find_api_error(error).cloned()
	}
}

fn find_api_error<'a>(error: &'a (dyn StdError + 'static)) -> Option<&'a ApiError> {
	match error.downcast_ref::<Error>() {
		Some(Error::Api(api)) => Some(api),
		Some(_) => None,
		None => error.downcast_ref::<ApiError>(),
	}
}

fn is_network(error: &(dyn StdError + 'static)) -> bool {
	match error.downcast_ref::<Error>() {
		Some(err) => err.is_network(),
		None => matches!(error.downcast_ref::<TransportError>(), Some(TransportError::Network { .. })),
	}
}
