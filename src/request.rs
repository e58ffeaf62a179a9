//! Request assembly: target resolution, query strings, and header merging.

pub mod config;

pub use config::*;

// crates.io
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Default `Content-Type` sent with every request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Resolves `target` against `base` and appends `params` as a query string.
///
/// Absolute `http(s)://` targets are used as-is. Relative targets are joined onto the base
/// with exactly one `/` between them, so `https://host/api` + `users/42` and
/// `https://host/api/` + `/users/42` both yield `https://host/api/users/42`. Parameters are
/// form-urlencoded in insertion order; an empty list leaves the URL untouched.
pub fn build_url(base: &Url, target: &str, params: &[(String, QueryValue)]) -> Result<Url, ConfigError> {
	let mut url = resolve_target(base, target)?;

	if !params.is_empty() {
		let mut pairs = url.query_pairs_mut();

		for (key, value) in params {
			pairs.append_pair(key, &value.to_string());
		}
	}

	Ok(url)
}

/// Merges headers in precedence order and attaches the bearer credential.
///
/// Layering, later entries winning on (case-insensitive) name collisions:
/// `Content-Type: application/json`, then `defaults`, then the cache directive, then
/// `overrides`. Finally `Authorization: Bearer <token>` is set when `token` is present and
/// non-empty; with no token the header is left exactly as the earlier layers produced it.
pub fn build_headers(
	defaults: &HeaderMap,
	overrides: &[(String, String)],
	cache: Option<CacheMode>,
	token: Option<&TokenSecret>,
) -> Result<HeaderMap, ConfigError> {
	let mut headers = HeaderMap::new();

	headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

	for (name, value) in defaults {
		headers.insert(name.clone(), value.clone());
	}

	if let Some(directive) = cache.and_then(CacheMode::cache_control) {
		headers.insert(CACHE_CONTROL, HeaderValue::from_static(directive));
	}

	for (name, value) in overrides {
		let (name, value) = parse_header(name, value)?;

		headers.insert(name, value);
	}

	if let Some(token) = token.filter(|token| !token.is_empty()) {
		let mut value = HeaderValue::from_str(&token.bearer()).map_err(|_| {
			ConfigError::InvalidHeaderValue { name: AUTHORIZATION.as_str().to_owned() }
		})?;

		value.set_sensitive(true);
		headers.insert(AUTHORIZATION, value);
	}

	Ok(headers)
}

/// Validates a caller-supplied header pair.
pub fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
	let header_name = HeaderName::from_bytes(name.as_bytes())
		.map_err(|_| ConfigError::InvalidHeaderName { name: name.to_owned() })?;
	let header_value = HeaderValue::from_str(value)
		.map_err(|_| ConfigError::InvalidHeaderValue { name: name.to_owned() })?;

	Ok((header_name, header_value))
}

fn resolve_target(base: &Url, target: &str) -> Result<Url, ConfigError> {
	let invalid = |source| ConfigError::InvalidTarget { target: target.to_owned(), source };

	if is_absolute(target) {
		return Url::parse(target).map_err(invalid);
	}
	if target.is_empty() {
		return Ok(base.clone());
	}

	let joined =
		format!("{}/{}", base.as_str().trim_end_matches('/'), target.trim_start_matches('/'));

	Url::parse(&joined).map_err(invalid)
}

fn is_absolute(target: &str) -> bool {
	let lower = target.get(..8).unwrap_or(target).to_ascii_lowercase();

	lower.starts_with("http://") || lower.starts_with("https://")
}
