//! Transport primitives for API calls.
//!
//! The module exposes [`ApiTransport`] alongside [`TransportRequest`] and
//! [`TransportResponse`] so downstream crates can plug in custom HTTP stacks (or in-memory
//! fakes) without touching request building or response normalization. The transport only
//! moves bytes: it receives a fully assembled request and hands back the raw status,
//! headers, and body. Status interpretation stays with the client.

// std
use std::ops::Deref;
// crates.io
use reqwest::header::RETRY_AFTER;
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing a single request.
///
/// The trait is the client's only dependency on an HTTP implementation. Implementations must
/// be `Send + Sync + 'static` so one transport can be shared (behind `Arc`) by many clients,
/// and the futures they return must be `Send` so callers can move requests across executors.
/// Dropping the returned future must abort the request; the client relies on this for
/// cancellation.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the raw response.
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// Fully assembled outbound request.
#[derive(Clone, Debug)]
pub struct TransportRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Final header set (defaults, overrides, and credentials already merged).
	pub headers: HeaderMap,
	/// Serialized JSON body, if the call carries one.
	pub body: Option<Vec<u8>>,
}
impl TransportRequest {
	/// Returns the body decoded as UTF-8, if present and valid.
	pub fn body_text(&self) -> Option<&str> {
		self.body.as_deref().and_then(|bytes| std::str::from_utf8(bytes).ok())
	}
}

/// Raw response handed back by a transport.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Response body bytes (possibly empty).
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Creates a response without headers.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Adds a header, replacing any previous value under the same name.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Retry-After hint expressed as a relative duration.
	pub fn retry_after(&self) -> Option<Duration> {
		parse_retry_after(&self.headers)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let TransportRequest { method, url, headers, body } = request;
			let mut builder = client.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(TransportResponse { status, headers, body })
		})
	}
}

pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn headers_with_retry_after(value: &'static str) -> HeaderMap {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static(value));

		headers
	}

	#[test]
	fn retry_after_accepts_delta_seconds() {
		assert_eq!(
			parse_retry_after(&headers_with_retry_after("120")),
			Some(Duration::seconds(120))
		);
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		assert_eq!(
			parse_retry_after(&headers_with_retry_after("Wed, 21 Oct 2015 07:28:00 GMT")),
			None
		);
		assert_eq!(parse_retry_after(&headers_with_retry_after("soon")), None);
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);
	}

	#[test]
	fn transport_request_exposes_body_text() {
		let request = TransportRequest {
			method: Method::POST,
			url: Url::parse("https://api.example.com/items").expect("Fixture URL should parse."),
			headers: HeaderMap::new(),
			body: Some(br#"{"a":1}"#.to_vec()),
		};

		assert_eq!(request.body_text(), Some(r#"{"a":1}"#));
	}
}
