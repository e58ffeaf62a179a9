//! Notification sinks used by the error presenter.

// self
use crate::_prelude::*;

/// Receives user-facing error notifications (the UI's toast, a log line, a CLI message).
pub trait Notifier
where
	Self: Send + Sync,
{
	/// Shows `message` to the user.
	fn notify_error(&self, message: &str);
}

/// Emits notifications as `warn`-level tracing events (no-op without the `tracing` feature).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;
impl Notifier for TracingNotifier {
	fn notify_error(&self, message: &str) {
		#[cfg(feature = "tracing")]
		{
			tracing::warn!(notification = message, "api error presented");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = message;
		}
	}
}

/// Collects notifications in memory for headless callers and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier(Arc<Mutex<Vec<String>>>);
impl RecordingNotifier {
	/// Messages received so far, oldest first.
	pub fn messages(&self) -> Vec<String> {
		self.0.lock().clone()
	}
}
impl Notifier for RecordingNotifier {
	fn notify_error(&self, message: &str) {
		self.0.lock().push(message.to_owned());
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn notifiers_accept_messages() {
		let recording = RecordingNotifier::default();
		let sinks: [&dyn Notifier; 2] = [&TracingNotifier, &recording];

		for sink in sinks {
			sink.notify_error("Session expired. Please log in again.");
		}

		assert_eq!(recording.messages(), ["Session expired. Please log in again."]);
	}
}
