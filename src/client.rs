//! The API client: single entry point for every outbound call.
//!
//! [`ApiClient`] owns the transport, the token supplier, the base URL, and any extra default
//! headers. Each verb method resolves the target, merges headers, attaches the bearer token,
//! races the transport against the caller's cancel signal, and normalizes the response into
//! a [`Reply`] or an [`Error`]. No retries are performed.

// self
use crate::{
	_prelude::*,
	auth::{NoToken, TokenSupplier},
	cancel::CancelSignal,
	config::ClientConfig,
	error::ConfigError,
	http::{ApiTransport, ReqwestTransport, TransportRequest, TransportResponse},
	obs::{self, RequestOutcome, RequestSpan},
	request::{self, RequestConfig},
	response::{self, ApiReply, PaginatedResponse, Reply},
};

/// JSON API client bound to a base URL, a transport, and a token supplier.
///
/// Cloning is cheap: the transport and supplier are shared behind `Arc`, so clones can serve
/// concurrent calls.
pub struct ApiClient<T = ReqwestTransport>
where
	T: ?Sized + ApiTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Credential accessor consulted once per request.
	pub token_supplier: Arc<dyn TokenSupplier>,
	/// Base URL that relative targets are joined onto.
	pub base_url: Url,
	/// Extra headers applied after `Content-Type` and before per-call overrides.
	pub default_headers: HeaderMap,
}
impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(base_url: Url, transport: impl Into<Arc<T>>) -> Self {
		Self {
			transport: transport.into(),
			token_supplier: Arc::new(NoToken),
			base_url,
			default_headers: HeaderMap::new(),
		}
	}

	/// Sets or replaces the token supplier.
	pub fn with_token_supplier(mut self, supplier: impl 'static + TokenSupplier) -> Self {
		self.token_supplier = Arc::new(supplier);

		self
	}

	/// Shares an existing token supplier.
	pub fn with_shared_token_supplier(mut self, supplier: Arc<dyn TokenSupplier>) -> Self {
		self.token_supplier = supplier;

		self
	}

	/// Adds a header sent with every request unless a call overrides it.
	pub fn with_default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.default_headers.insert(name, value);

		self
	}

	/// Sends a `GET` request.
	pub async fn get<R>(&self, path: &str, config: impl Into<Option<RequestConfig>>) -> Result<Reply<R>>
	where
		R: DeserializeOwned,
	{
		self.request::<_, ()>(Method::GET, path, None, config.into().unwrap_or_default()).await
	}

	/// Sends a `GET` request against a paginated list endpoint.
	pub async fn get_page<R>(
		&self,
		path: &str,
		config: impl Into<Option<RequestConfig>>,
	) -> Result<ApiReply<PaginatedResponse<R>>>
	where
		R: DeserializeOwned,
	{
		self.request::<_, ()>(Method::GET, path, None, config.into().unwrap_or_default()).await
	}

	/// Sends a `POST` request with an optional JSON body.
	pub async fn post<R, B>(
		&self,
		path: &str,
		body: Option<&B>,
		config: impl Into<Option<RequestConfig>>,
	) -> Result<Reply<R>>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(Method::POST, path, body, config.into().unwrap_or_default()).await
	}

	/// Sends a `PUT` request with an optional JSON body.
	pub async fn put<R, B>(
		&self,
		path: &str,
		body: Option<&B>,
		config: impl Into<Option<RequestConfig>>,
	) -> Result<Reply<R>>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(Method::PUT, path, body, config.into().unwrap_or_default()).await
	}

	/// Sends a `PATCH` request with an optional JSON body.
	pub async fn patch<R, B>(
		&self,
		path: &str,
		body: Option<&B>,
		config: impl Into<Option<RequestConfig>>,
	) -> Result<Reply<R>>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(Method::PATCH, path, body, config.into().unwrap_or_default()).await
	}

	/// Sends a `DELETE` request.
	pub async fn delete<R>(
		&self,
		path: &str,
		config: impl Into<Option<RequestConfig>>,
	) -> Result<Reply<R>>
	where
		R: DeserializeOwned,
	{
		self.request::<_, ()>(Method::DELETE, path, None, config.into().unwrap_or_default()).await
	}

	/// Sends an arbitrary request and decodes a successful body as `E`.
	///
	/// All verb helpers delegate here.
	pub async fn request<E, B>(
		&self,
		method: Method,
		path: &str,
		body: Option<&B>,
		config: RequestConfig,
	) -> Result<ApiReply<E>>
	where
		E: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let span = RequestSpan::new(&method, path);

		obs::record_request_outcome(&method, RequestOutcome::Attempt);

		let result = span
			.instrument(async {
				let response = self.dispatch(method.clone(), path, body, config).await?;

				response::normalize(response)
			})
			.await;
		let outcome = RequestOutcome::of(&result);

		span.record_outcome(outcome);
		obs::record_request_outcome(&method, outcome);

		result
	}

	/// Assembles the transport request without sending it.
	pub fn build_request<B>(
		&self,
		method: Method,
		path: &str,
		body: Option<&B>,
		config: &RequestConfig,
	) -> Result<TransportRequest>
	where
		B: ?Sized + Serialize,
	{
		let url = request::build_url(&self.base_url, path, &config.params)?;
		let token = self.token_supplier.token();
		let headers = request::build_headers(
			&self.default_headers,
			&config.headers,
			config.cache,
			token.as_ref(),
		)?;
		let body = body
			.map(|body| serde_json::to_vec(body).map_err(ConfigError::BodySerialize))
			.transpose()?;

		Ok(TransportRequest { method, url, headers, body })
	}

	async fn dispatch<B>(
		&self,
		method: Method,
		path: &str,
		body: Option<&B>,
		config: RequestConfig,
	) -> Result<TransportResponse>
	where
		B: ?Sized + Serialize,
	{
		if config.signal.as_ref().is_some_and(CancelSignal::is_cancelled) {
			return Err(Error::Cancelled);
		}

		let request = self.build_request(method, path, body, &config)?;
		let Some(signal) = config.signal else {
			return Ok(self.transport.execute(request).await?);
		};

		tokio::select! {
			biased;
			_ = signal.cancelled() => Err(Error::Cancelled),
			result = self.transport.execute(request) => result.map_err(Error::from),
		}
	}
}
impl ApiClient<ReqwestTransport> {
	/// Creates an anonymous client backed by a default reqwest transport.
	pub fn new(base_url: Url) -> Self {
		Self::with_transport(base_url, ReqwestTransport::default())
	}

	/// Creates a client from validated configuration (timeout and user agent applied to the
	/// reqwest transport).
	pub fn from_config(config: &ClientConfig) -> Result<Self> {
		let transport = config.build_transport()?;

		Ok(Self::with_transport(config.base_url.clone(), transport))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			token_supplier: Arc::clone(&self.token_supplier),
			base_url: self.base_url.clone(),
			default_headers: self.default_headers.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.base_url.as_str())
			.field("default_headers", &self.default_headers)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		_preludet::{StubTransport, build_stub_client},
		auth::{SharedToken, StaticToken},
		error::{ApiError, TransportError},
	};

	fn ok_envelope() -> serde_json::Value {
		json!({ "data": { "id": 42 }, "message": "ok", "statusCode": 200 })
	}

	fn header(request: &TransportRequest, name: HeaderName) -> Option<String> {
		request.headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
	}

	#[tokio::test]
	async fn get_sends_bearer_token_and_maps_not_found() {
		let stub = Arc::new(StubTransport::json(404, json!({ "message": "not found" })));
		let client = build_stub_client(stub.clone()).with_token_supplier(StaticToken::new("abc"));
		let err = client
			.get::<serde_json::Value>("/users/42", None)
			.await
			.expect_err("404 should surface as an API error.");
		let request = stub.last_request().expect("Transport should receive the request.");

		assert_eq!(request.method, Method::GET);
		assert_eq!(request.url.as_str(), "https://api.example.com/users/42");
		assert_eq!(header(&request, AUTHORIZATION).as_deref(), Some("Bearer abc"));
		assert!(request.body.is_none());

		match err {
			Error::Api(ApiError { status_code, message, .. }) => {
				assert_eq!(status_code, 404);
				assert_eq!(message, "not found");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[tokio::test]
	async fn missing_or_empty_token_sends_no_authorization() {
		let stub = Arc::new(StubTransport::json(200, ok_envelope()));
		let client = build_stub_client(stub.clone());

		client.get::<serde_json::Value>("/a", None).await.expect("Call should succeed.");

		let client = client.with_token_supplier(|| Some(String::new()));

		client.get::<serde_json::Value>("/b", None).await.expect("Call should succeed.");

		for request in stub.requests() {
			assert!(request.headers.get(AUTHORIZATION).is_none());
			assert_eq!(header(&request, CONTENT_TYPE).as_deref(), Some("application/json"));
		}
	}

	#[tokio::test]
	async fn shared_token_rotation_applies_to_next_call() {
		let stub = Arc::new(StubTransport::json(200, ok_envelope()));
		let token = SharedToken::new("old");
		let client = build_stub_client(stub.clone()).with_token_supplier(token.clone());

		client.get::<serde_json::Value>("/me", None).await.expect("Call should succeed.");
		token.replace("new");
		client.get::<serde_json::Value>("/me", None).await.expect("Call should succeed.");

		let seen: Vec<_> =
			stub.requests().iter().filter_map(|r| header(r, AUTHORIZATION)).collect();

		assert_eq!(seen, ["Bearer old", "Bearer new"]);
	}

	#[tokio::test]
	async fn caller_headers_win_and_query_keeps_order() {
		let stub = Arc::new(StubTransport::json(200, ok_envelope()));
		let client = build_stub_client(stub.clone()).with_default_header(
			HeaderName::from_static("x-client"),
			HeaderValue::from_static("default"),
		);
		let config = RequestConfig::new()
			.header("Content-Type", "application/vnd.api+json")
			.header("X-Client", "override")
			.param("z", 1)
			.param("a", "x y")
			.param("z", false);

		client.get::<serde_json::Value>("/items", config).await.expect("Call should succeed.");

		let request = stub.last_request().expect("Transport should receive the request.");

		assert_eq!(request.url.as_str(), "https://api.example.com/items?z=1&a=x+y&z=false");
		assert_eq!(header(&request, CONTENT_TYPE).as_deref(), Some("application/vnd.api+json"));
		assert_eq!(
			header(&request, HeaderName::from_static("x-client")).as_deref(),
			Some("override")
		);
	}

	#[tokio::test]
	async fn mutating_verbs_serialize_json_bodies() {
		let stub = Arc::new(StubTransport::json(200, ok_envelope()));
		let client = build_stub_client(stub.clone());
		let body = json!({ "name": "Ada" });

		client.post::<serde_json::Value, _>("/users", Some(&body), None).await.expect("POST");
		client.put::<serde_json::Value, _>("/users/1", Some(&body), None).await.expect("PUT");
		client.patch::<serde_json::Value, _>("/users/1", Some(&body), None).await.expect("PATCH");
		client.post::<serde_json::Value, ()>("/logout", None, None).await.expect("bare POST");
		client.delete::<serde_json::Value>("/users/1", None).await.expect("DELETE");

		let requests = stub.requests();
		let methods: Vec<_> = requests.iter().map(|r| r.method.clone()).collect();

		assert_eq!(methods, [Method::POST, Method::PUT, Method::PATCH, Method::POST, Method::DELETE]);
		assert_eq!(requests[0].body_text(), Some(r#"{"name":"Ada"}"#));
		assert!(requests[3].body.is_none());
		assert!(requests[4].body.is_none());
	}

	#[tokio::test]
	async fn get_page_decodes_items_and_meta() {
		let stub = Arc::new(StubTransport::json(
			200,
			json!({
				"data": [{ "id": 1 }, { "id": 2 }],
				"message": "",
				"statusCode": 200,
				"meta": { "page": 2, "limit": 2, "total": 4, "totalPages": 2 },
			}),
		));
		let client = build_stub_client(stub.clone());
		let page = client
			.get_page::<serde_json::Value>("/users", RequestConfig::new().param("page", 2))
			.await
			.expect("Paginated call should succeed.")
			.into_envelope()
			.expect("200 should carry an envelope.");
		let request = stub.last_request().expect("Transport should receive the request.");

		assert_eq!(request.method, Method::GET);
		assert_eq!(request.url.as_str(), "https://api.example.com/users?page=2");
		assert_eq!(page.envelope.data, [json!({ "id": 1 }), json!({ "id": 2 })]);
		assert_eq!(page.meta.total, 4);
		assert!(!page.meta.has_next());
	}

	#[tokio::test]
	async fn no_content_yields_empty_reply() {
		let stub = Arc::new(StubTransport::respond(204, "garbage"));
		let client = build_stub_client(stub);
		let reply = client
			.delete::<serde_json::Value>("/users/1", None)
			.await
			.expect("204 should succeed.");

		assert!(reply.is_no_content());
	}

	#[tokio::test]
	async fn pre_cancelled_signal_never_reaches_transport() {
		let stub = Arc::new(StubTransport::json(200, ok_envelope()));
		let client = build_stub_client(stub.clone());
		let signal = CancelSignal::new();

		signal.cancel();

		let err = client
			.get::<serde_json::Value>("/slow", RequestConfig::new().signal(signal))
			.await
			.expect_err("Cancelled call should fail.");

		assert!(err.is_cancelled());
		assert_eq!(stub.calls(), 0);
	}

	#[tokio::test]
	async fn pre_cancelled_signal_wins_over_invalid_headers() {
		let stub = Arc::new(StubTransport::json(200, ok_envelope()));
		let client = build_stub_client(stub.clone());
		let signal = CancelSignal::new();

		signal.cancel();

		let config = RequestConfig::new().header("X-Bad", "line\nbreak").signal(signal);
		let err = client
			.get::<serde_json::Value>("/slow", config)
			.await
			.expect_err("Cancelled call should fail.");

		assert!(err.is_cancelled());
		assert_eq!(stub.calls(), 0);
	}

	#[tokio::test]
	async fn cancelling_in_flight_call_yields_cancelled() {
		let stub = Arc::new(StubTransport::pending());
		let client = build_stub_client(stub.clone());
		let signal = CancelSignal::new();
		let trigger = signal.clone();
		let (result, ()) = tokio::join!(
			client.get::<serde_json::Value>("/slow", RequestConfig::new().signal(signal)),
			async move {
				tokio::task::yield_now().await;
				trigger.cancel();
			}
		);

		assert!(result.expect_err("Cancelled call should fail.").is_cancelled());
		assert_eq!(stub.calls(), 1);
	}

	#[tokio::test]
	async fn transport_failures_propagate_as_transport_errors() {
		let stub = Arc::new(StubTransport::failing(|| {
			TransportError::network(std::io::Error::new(
				std::io::ErrorKind::ConnectionRefused,
				"refused",
			))
		}));
		let client = build_stub_client(stub);
		let err = client
			.get::<serde_json::Value>("/down", None)
			.await
			.expect_err("Transport failure should propagate.");

		assert!(err.is_network());
	}

	#[test]
	fn build_request_rejects_invalid_override() {
		let client = build_stub_client(Arc::new(StubTransport::respond(200, "")));
		let err = client
			.build_request::<()>(
				Method::GET,
				"/x",
				None,
				&RequestConfig::new().header("X-Bad", "line\nbreak"),
			)
			.expect_err("Header values with newlines must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidHeaderValue { .. })));
	}
}
