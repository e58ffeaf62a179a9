//! Response envelopes and the normalizer turning raw transport responses into replies or
//! typed errors.

// crates.io
use serde::de::IgnoredAny;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	error::{ApiError, ParseError},
	http::TransportResponse,
};

/// Standard shape returned by every successful API call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	/// Endpoint payload.
	pub data: T,
	/// Human-readable status message; empty when the server sent none.
	#[serde(default)]
	pub message: String,
	/// Status code echoed by the server.
	pub status_code: u16,
}

/// Reply carrying the standard [`ApiResponse`] envelope.
pub type Reply<T> = ApiReply<ApiResponse<T>>;

/// Reply for calls whose payload is irrelevant.
///
/// `data` may be missing, `null`, or any JSON value; only the message and status code matter.
pub type AckReply = Reply<Option<IgnoredAny>>;

/// Envelope for list endpoints that support pagination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
	/// Page items plus the usual message and status code.
	#[serde(flatten)]
	pub envelope: ApiResponse<Vec<T>>,
	/// Paging cursor information.
	pub meta: PageMeta,
}

/// Paging information attached to [`PaginatedResponse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
	/// 1-based page index.
	pub page: u32,
	/// Page size requested.
	pub limit: u32,
	/// Total item count across all pages.
	pub total: u64,
	/// Total page count.
	pub total_pages: u32,
}
impl PageMeta {
	/// Whether another page follows this one.
	pub fn has_next(&self) -> bool {
		self.page < self.total_pages
	}
}

/// Successful outcome of a call.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiReply<T> {
	/// Decoded success envelope.
	Envelope(T),
	/// `204 No Content`; nothing was parsed.
	NoContent,
}
impl<T> ApiReply<T> {
	/// Returns the envelope, or `None` for `204 No Content`.
	pub fn into_envelope(self) -> Option<T> {
		match self {
			Self::Envelope(envelope) => Some(envelope),
			Self::NoContent => None,
		}
	}

	/// Borrows the envelope, if any.
	pub fn envelope(&self) -> Option<&T> {
		match self {
			Self::Envelope(envelope) => Some(envelope),
			Self::NoContent => None,
		}
	}

	/// Whether the server answered `204 No Content`.
	pub fn is_no_content(&self) -> bool {
		matches!(self, Self::NoContent)
	}
}
impl<T> ApiReply<ApiResponse<T>> {
	/// Returns the payload, or `None` for `204 No Content`.
	pub fn into_data(self) -> Option<T> {
		self.into_envelope().map(|envelope| envelope.data)
	}
}

/// Normalizes a raw response into a reply or a typed failure.
///
/// - `204` short-circuits: the body is ignored and [`ApiReply::NoContent`] is returned.
/// - Any other non-2xx status becomes [`Error::Api`] whose status equals the response status.
/// - Remaining 2xx bodies are decoded as `E`; malformed JSON becomes [`Error::Parse`].
pub fn normalize<E>(response: TransportResponse) -> Result<ApiReply<E>>
where
	E: DeserializeOwned,
{
	let status = response.status;

	if status == StatusCode::NO_CONTENT {
		return Ok(ApiReply::NoContent);
	}
	if !status.is_success() {
		return Err(api_error(&response).into());
	}

	Ok(ApiReply::Envelope(decode_json(&response.body, status.as_u16())?))
}

/// Builds the [`ApiError`] for a non-2xx response.
///
/// The JSON body, when parseable, supplies `message` and `errors`; a missing body or message
/// falls back to the status text (canonical reason phrase).
pub fn api_error(response: &TransportResponse) -> ApiError {
	let status = response.status;
	let body = serde_json::from_slice::<Value>(&response.body).ok();
	let message = body
		.as_ref()
		.and_then(|body| body.get("message"))
		.and_then(Value::as_str)
		.map(str::to_owned)
		.unwrap_or_else(|| status_text(status));
	let errors = body
		.as_ref()
		.and_then(|body| body.get("errors"))
		.and_then(|errors| serde_json::from_value(errors.clone()).ok());

	ApiError { message, status_code: status.as_u16(), errors, retry_after: response.retry_after() }
}

/// Canonical reason phrase for `status`, or `HTTP <code>` for unregistered codes.
pub fn status_text(status: StatusCode) -> String {
	status
		.canonical_reason()
		.map(str::to_owned)
		.unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn decode_json<E>(body: &[u8], status: u16) -> Result<E, ParseError>
where
	E: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| ParseError { source, status })
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::RETRY_AFTER;
	use serde_json::json;
	// self
	use super::*;

	fn response(status: u16, body: &str) -> TransportResponse {
		TransportResponse::new(
			StatusCode::from_u16(status).expect("Fixture status should be valid."),
			body.as_bytes().to_vec(),
		)
	}

	#[derive(Debug, PartialEq, Deserialize)]
	struct Item {
		id: u32,
	}

	#[test]
	fn no_content_skips_parsing() {
		let reply = normalize::<ApiResponse<Item>>(response(204, "not json at all"))
			.expect("204 must never be parsed.");

		assert!(reply.is_no_content());
		assert_eq!(reply.into_data(), None);
	}

	#[test]
	fn success_decodes_envelope() {
		let reply = normalize::<ApiResponse<Item>>(response(
			200,
			r#"{"data":{"id":7},"message":"ok","statusCode":200}"#,
		))
		.expect("Envelope should decode.");
		let envelope = reply.into_envelope().expect("200 should carry an envelope.");

		assert_eq!(envelope.data, Item { id: 7 });
		assert_eq!(envelope.message, "ok");
	}

	#[test]
	fn error_body_supplies_message_and_field_errors() {
		let body = json!({
			"message": "Validation failed",
			"statusCode": 422,
			"errors": { "email": ["taken", "too long"] },
		});
		let err = normalize::<ApiResponse<Item>>(response(422, &body.to_string()))
			.expect_err("422 must surface as an error.");
		let api = err.api().expect("Non-2xx must map to the API variant.");

		assert_eq!(api.status_code, 422);
		assert_eq!(api.message, "Validation failed");
		assert_eq!(
			api.errors.as_ref().and_then(|errors| errors.get("email")).map(Vec::len),
			Some(2)
		);
	}

	#[test]
	fn missing_or_unparseable_body_falls_back_to_status_text() {
		let err = normalize::<ApiResponse<Item>>(response(503, "<html>down</html>"))
			.expect_err("503 must surface as an error.");

		assert_eq!(err.api().map(|api| api.message.as_str()), Some("Service Unavailable"));

		let err = normalize::<ApiResponse<Item>>(response(404, ""))
			.expect_err("404 must surface as an error.");

		assert_eq!(err.api().map(|api| api.message.as_str()), Some("Not Found"));

		let err = normalize::<ApiResponse<Item>>(response(599, r#"{"errors":"oops"}"#))
			.expect_err("599 must surface as an error.");
		let api = err.api().expect("Non-2xx must map to the API variant.");

		assert_eq!(api.message, "HTTP 599");
		assert_eq!(api.errors, None);
	}

	#[test]
	fn error_status_comes_from_transport_not_body() {
		let err = normalize::<ApiResponse<Item>>(response(
			400,
			r#"{"message":"bad","statusCode":418}"#,
		))
		.expect_err("400 must surface as an error.");

		assert_eq!(err.status_code(), Some(400));
	}

	#[test]
	fn retry_after_is_captured_on_errors() {
		let response = response(429, r#"{"message":"slow down"}"#)
			.with_header(RETRY_AFTER, HeaderValue::from_static("30"));
		let api = api_error(&response);

		assert_eq!(api.retry_after, Some(Duration::seconds(30)));
	}

	#[test]
	fn malformed_success_body_is_a_parse_error_with_path() {
		let err = normalize::<ApiResponse<Item>>(response(
			200,
			r#"{"data":{"id":"seven"},"message":"ok","statusCode":200}"#,
		))
		.expect_err("Wrong payload type must fail to parse.");

		match err {
			Error::Parse(parse) => {
				assert_eq!(parse.status, 200);
				assert_eq!(parse.path(), "data.id");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn ack_reply_tolerates_any_data() {
		for body in [
			r#"{"message":"Logged out","statusCode":200}"#,
			r#"{"data":null,"message":"Logged out","statusCode":200}"#,
			r#"{"data":{"sessions":3},"message":"Logged out","statusCode":200}"#,
		] {
			let reply = normalize::<ApiResponse<Option<IgnoredAny>>>(response(200, body))
				.expect("Acknowledgement should decode regardless of data.");
			let envelope = reply.into_envelope().expect("200 should carry an envelope.");

			assert_eq!(envelope.message, "Logged out");
		}
	}

	#[test]
	fn paginated_envelope_flattens_meta() {
		let reply = normalize::<PaginatedResponse<Item>>(response(
			200,
			r#"{"data":[{"id":1},{"id":2}],"message":"","statusCode":200,
				"meta":{"page":1,"limit":2,"total":5,"totalPages":3}}"#,
		))
		.expect("Paginated envelope should decode.");
		let page = reply.into_envelope().expect("200 should carry an envelope.");

		assert_eq!(page.envelope.data.len(), 2);
		assert!(page.meta.has_next());
	}
}
