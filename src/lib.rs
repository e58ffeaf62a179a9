//! Typed JSON API client with envelope-aware responses, pluggable bearer tokens, cooperative
//! cancellation, and user-facing error presentation.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cancel;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod obs;
pub mod presenter;
pub mod request;
pub mod response;
pub mod services;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests: stub transports plus reqwest-backed
	//! clients pointed at local mock servers. Enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use crate::{
		client::ApiClient,
		error::TransportError,
		http::{ApiTransport, ReqwestTransport, TransportFuture, TransportRequest, TransportResponse},
	};

	type Responder = Box<dyn Fn() -> Result<TransportResponse, TransportError> + Send + Sync>;

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs an [`ApiClient`] backed by [`test_reqwest_transport`] and rooted at `base_url`.
	pub fn build_reqwest_test_client(base_url: &str) -> ApiClient {
		let base_url = Url::parse(base_url).expect("Mock server base URL should parse.");

		ApiClient::with_transport(base_url, test_reqwest_transport())
	}

	/// In-memory transport that records every request and replays a canned outcome.
	pub struct StubTransport {
		responder: Responder,
		hang: bool,
		calls: AtomicUsize,
		requests: Mutex<Vec<TransportRequest>>,
	}
	impl StubTransport {
		/// Replies with `status` and a raw body.
		pub fn respond(status: u16, body: impl Into<Vec<u8>>) -> Self {
			let status = StatusCode::from_u16(status).expect("Stub status code should be valid.");
			let body = body.into();

			Self::from_responder(Box::new(move || {
				Ok(TransportResponse::new(status, body.clone()))
			}))
		}

		/// Replies with `status` and a JSON body.
		pub fn json(status: u16, body: serde_json::Value) -> Self {
			let payload = serde_json::to_vec(&body).expect("Stub JSON body should serialize.");

			Self::respond(status, payload)
		}

		/// Replies with a full response, headers included.
		pub fn response(response: TransportResponse) -> Self {
			Self::from_responder(Box::new(move || Ok(response.clone())))
		}

		/// Fails every call with the error produced by `make`.
		pub fn failing(make: impl 'static + Send + Sync + Fn() -> TransportError) -> Self {
			Self::from_responder(Box::new(move || Err(make())))
		}

		/// Never resolves; useful when exercising cancellation.
		pub fn pending() -> Self {
			let mut stub = Self::respond(200, Vec::new());

			stub.hang = true;

			stub
		}

		/// Number of requests handed to the transport.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}

		/// Requests recorded so far, in dispatch order.
		pub fn requests(&self) -> Vec<TransportRequest> {
			self.requests.lock().clone()
		}

		/// The most recent request, if any.
		pub fn last_request(&self) -> Option<TransportRequest> {
			self.requests.lock().last().cloned()
		}

		fn from_responder(responder: Responder) -> Self {
			Self { responder, hang: false, calls: AtomicUsize::new(0), requests: Default::default() }
		}
	}
	impl ApiTransport for StubTransport {
		fn execute(&self, request: TransportRequest) -> TransportFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.requests.lock().push(request);

			Box::pin(async move {
				if self.hang {
					std::future::pending::<()>().await;
				}

				(self.responder)()
			})
		}
	}

	/// Wraps a [`StubTransport`] in an [`ApiClient`] rooted at `https://api.example.com`.
	pub fn build_stub_client(stub: Arc<StubTransport>) -> ApiClient<StubTransport> {
		let base_url =
			Url::parse("https://api.example.com").expect("Stub base URL should parse.");

		ApiClient::with_transport(base_url, stub)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{
		Client as ReqwestClient, Error as ReqwestError, Method, StatusCode,
		header::{HeaderMap, HeaderName, HeaderValue},
	};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
