//! Client configuration sourced from explicit values or the process environment.

// self
use crate::{_prelude::*, error::ConfigError, http::ReqwestTransport};

/// Validated settings used to build an [`ApiClient`](crate::client::ApiClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL every relative endpoint path is resolved against.
	pub base_url: Url,
	/// Whole-request timeout applied by the transport.
	pub timeout: Option<Duration>,
	/// `User-Agent` header sent by the transport.
	pub user_agent: Option<String>,
}
impl ClientConfig {
	/// Variable holding the API base URL.
	pub const BASE_URL_VAR: &'static str = "API_BASE_URL";
	/// Variable holding the request timeout in whole seconds.
	pub const TIMEOUT_VAR: &'static str = "API_TIMEOUT_SECS";
	/// Variable holding the `User-Agent` override.
	pub const USER_AGENT_VAR: &'static str = "API_USER_AGENT";

	/// Creates a configuration with no timeout and the transport's default user agent.
	pub fn new(base_url: Url) -> Result<Self, ConfigError> {
		if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
			return Err(ConfigError::UnsupportedScheme { url: base_url.to_string() });
		}

		Ok(Self { base_url, timeout: None, user_agent: None })
	}

	/// Parses `base_url` and validates it.
	pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(base_url.trim())
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Self::new(url)
	}

	/// Reads the configuration from the process environment.
	///
	/// `API_BASE_URL` is required; `API_TIMEOUT_SECS` and `API_USER_AGENT` are optional.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|var| std::env::var(var).ok())
	}

	/// Reads the configuration through `lookup`, which maps variable names to values.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |var: &'static str| lookup(var).filter(|value| !value.trim().is_empty());
		let base_url = read(Self::BASE_URL_VAR)
			.ok_or(ConfigError::MissingVar { var: Self::BASE_URL_VAR })?;
		let mut config = Self::parse(&base_url)?;

		if let Some(raw) = read(Self::TIMEOUT_VAR) {
			let secs = raw
				.trim()
				.parse::<u32>()
				.ok()
				.filter(|secs| *secs > 0)
				.ok_or(ConfigError::InvalidVar { var: Self::TIMEOUT_VAR, value: raw.clone() })?;

			config.timeout = Some(Duration::seconds(secs.into()));
		}
		if let Some(agent) = read(Self::USER_AGENT_VAR) {
			config.user_agent = Some(agent);
		}

		Ok(config)
	}

	/// Sets the whole-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Sets the `User-Agent` header.
	pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
		self.user_agent = Some(agent.into());

		self
	}

	/// Builds the reqwest transport described by this configuration.
	pub fn build_transport(&self) -> Result<ReqwestTransport, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = self.timeout {
			let timeout = std::time::Duration::try_from(timeout)
				.map_err(ConfigError::http_client_build)?;

			builder = builder.timeout(timeout);
		}
		if let Some(agent) = &self.user_agent {
			builder = builder.user_agent(agent.as_str());
		}

		let client = builder.build().map_err(ConfigError::http_client_build)?;

		Ok(ReqwestTransport::with_client(client))
	}
}
