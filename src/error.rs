//! Client-level error types shared by the transport, request builder, and response normalizer.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every call through [`ApiClient`](crate::client::ApiClient) resolves to either a reply or one
/// of these variants; the client never swallows a failure.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Server answered with a non-2xx status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Successful status carrying a body that is not the expected JSON.
	#[error(transparent)]
	Parse(#[from] ParseError),
	/// Request could not be assembled locally.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller aborted the request through its cancel signal.
	#[error("Request was cancelled.")]
	Cancelled,
}
impl Error {
	/// Returns the normalized API error when the server rejected the request.
	pub fn api(&self) -> Option<&ApiError> {
		match self {
			Self::Api(e) => Some(e),
			_ => None,
		}
	}

	/// HTTP status associated with the failure, when one was received.
	pub fn status_code(&self) -> Option<u16> {
		match self {
			Self::Api(e) => Some(e.status_code),
			Self::Parse(e) => Some(e.status),
			_ => None,
		}
	}

	/// Whether the failure came from caller-initiated cancellation.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}

	/// Whether the remote host could not be reached at all.
	pub fn is_network(&self) -> bool {
		matches!(self, Self::Transport(TransportError::Network { .. }))
	}
}

/// Normalized non-2xx failure.
///
/// Mirrors the server's error body: `{ "message": .., "statusCode": .., "errors": { field: [..] } }`.
/// The status code always comes from the HTTP response, never from the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[serde(rename_all = "camelCase")]
#[error("Server responded with {status_code}: {message}")]
pub struct ApiError {
	/// Server-supplied message, or the status text when the body carried none.
	pub message: String,
	/// HTTP status code of the response.
	pub status_code: u16,
	/// Field-level validation messages, keyed by field name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub errors: Option<BTreeMap<String, Vec<String>>>,
	/// Retry-After hint from upstream, if supplied.
	#[serde(skip)]
	pub retry_after: Option<Duration>,
}
impl ApiError {
	/// Creates an error without field details.
	pub fn new(status_code: u16, message: impl Into<String>) -> Self {
		Self { message: message.into(), status_code, errors: None, retry_after: None }
	}

	/// Attaches field-level validation messages.
	pub fn with_errors(mut self, errors: BTreeMap<String, Vec<String>>) -> Self {
		self.errors = Some(errors);

		self
	}

	/// Returns `true` when the server reported per-field validation messages.
	pub fn has_field_errors(&self) -> bool {
		self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
	}
}

/// Response body could not be decoded into the expected shape.
#[derive(Debug, ThisError)]
#[error("API responded with malformed JSON (status {status}).")]
pub struct ParseError {
	/// Structured parsing failure, including the JSON path that failed.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code of the response.
	pub status: u16,
}
impl ParseError {
	/// JSON path at which decoding failed (e.g. `data.user.id`).
	pub fn path(&self) -> String {
		self.source.path().to_string()
	}
}

/// Configuration and request assembly failures detected before anything is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL must be absolute and use `http` or `https`.
	#[error("Base URL `{url}` must use http or https.")]
	UnsupportedScheme {
		/// Offending URL.
		url: String,
	},
	/// Request target cannot be resolved into a URL.
	#[error("Request target `{target}` is not a valid URL.")]
	InvalidTarget {
		/// Target path or URL given by the caller.
		target: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Required environment variable is absent.
	#[error("Environment variable `{var}` is not set.")]
	MissingVar {
		/// Variable name.
		var: &'static str,
	},
	/// Environment variable holds an unusable value.
	#[error("Environment variable `{var}` has an invalid value `{value}`.")]
	InvalidVar {
		/// Variable name.
		var: &'static str,
		/// Raw value read from the environment.
		value: String,
	},
	/// Header name is not a valid HTTP token.
	#[error("Header name `{name}` is invalid.")]
	InvalidHeaderName {
		/// Offending header name.
		name: String,
	},
	/// Header value contains characters HTTP does not allow.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeaderValue {
		/// Header whose value was rejected.
		name: String,
	},
	/// Request body cannot be serialized as JSON.
	#[error("Request body could not be serialized as JSON.")]
	BodySerialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Connection could not be established (DNS failure, refused, unreachable).
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Transport gave up waiting for the server.
	#[error("Request timed out while calling the API.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// Any other failure reported by the HTTP client.
	#[error("HTTP client error occurred while calling the API.")]
	Other {
		/// Transport-specific error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Wraps any other transport error.
	pub fn other(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Other { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::timeout(e)
		} else if e.is_connect() {
			Self::network(e)
		} else {
			Self::other(e)
		}
	}
}
