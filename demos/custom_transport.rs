//! Demonstrates plugging an in-memory transport into the client.
//!
//! 1. Implement [`ApiTransport`] so the transport turns a [`TransportRequest`] into a
//!    [`TransportResponse`] (or a [`TransportError`]).
//! 2. Wrap it in `Arc` and pass it to [`ApiClient::with_transport`].
//! 3. Route failures through an [`ErrorPresenter`] to get user-facing messages.

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use color_eyre::Result;
use serde::Deserialize;
// self
use envelope_client::{
	auth::StaticToken,
	cancel::CancelSignal,
	client::ApiClient,
	error::TransportError,
	http::{ApiTransport, TransportFuture, TransportRequest, TransportResponse},
	presenter::{ErrorPresenter, TracingNotifier},
	request::RequestConfig,
	reqwest::StatusCode,
	url::Url,
};

#[derive(Debug, Deserialize)]
struct Todo {
	id: u32,
	title: String,
}

/// Serves canned JSON bodies keyed by path; unknown hosts fail like a DNS error would.
#[derive(Default)]
struct CannedTransport {
	routes: HashMap<&'static str, (StatusCode, &'static str)>,
}
impl CannedTransport {
	fn route(mut self, path: &'static str, status: StatusCode, body: &'static str) -> Self {
		self.routes.insert(path, (status, body));

		self
	}
}
impl ApiTransport for CannedTransport {
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			if request.url.host_str() != Some("todos.local") {
				return Err(TransportError::network(std::io::Error::new(
					std::io::ErrorKind::NotFound,
					"host not found",
				)));
			}

			let (status, body) = self
				.routes
				.get(request.url.path())
				.copied()
				.unwrap_or((StatusCode::NOT_FOUND, r#"{"message":""}"#));

			Ok(TransportResponse::new(status, body))
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let transport = Arc::new(
		CannedTransport::default()
			.route(
				"/todos/1",
				StatusCode::OK,
				r#"{"data":{"id":1,"title":"Write docs"},"message":"ok","statusCode":200}"#,
			)
			.route("/todos/1/done", StatusCode::NO_CONTENT, ""),
	);
	let client: ApiClient<CannedTransport> =
		ApiClient::with_transport(Url::parse("https://todos.local")?, transport)
			.with_token_supplier(StaticToken::new("demo-token"));
	let presenter = ErrorPresenter::new(TracingNotifier);
	let todo = client.get::<Todo>("/todos/1", None).await?.into_data();

	if let Some(todo) = todo {
		println!("Fetched todo #{}: {}.", todo.id, todo.title);
	}

	let done = client.put::<(), ()>("/todos/1/done", None, None).await?;

	println!("Marking done returned no content: {}.", done.is_no_content());

	let missing = client.get::<Todo>("/todos/2", None).await.expect_err("Route is not canned.");

	println!("Missing todo: {}", presenter.message(&missing, None));

	let offline = ApiClient::<CannedTransport>::with_transport(
		Url::parse("https://elsewhere.local")?,
		Arc::clone(&client.transport),
	);
	let err = offline.get::<Todo>("/todos/1", None).await.expect_err("Host is unreachable.");

	println!("Offline: {}", presenter.message(&err, None));

	let signal = CancelSignal::new();

	signal.cancel();

	let err = client
		.get::<Todo>("/todos/1", RequestConfig::new().signal(signal))
		.await
		.expect_err("Signal was already cancelled.");

	println!("Cancelled: {}", presenter.message(&err, None));

	Ok(())
}
