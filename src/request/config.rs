//! Per-call overrides: headers, query parameters, cancellation, and cache directives.

// self
use crate::{_prelude::*, cancel::CancelSignal};

/// Optional per-call configuration passed to the client's verb methods.
///
/// Constructed per call and consumed by it. Headers and parameters keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct RequestConfig {
	/// Header overrides; these win over client defaults on name collisions.
	pub headers: Vec<(String, String)>,
	/// Query parameters appended to the URL in insertion order.
	pub params: Vec<(String, QueryValue)>,
	/// Cancellation signal raced against the transport.
	pub signal: Option<CancelSignal>,
	/// Cache directive translated into a `Cache-Control` request header.
	pub cache: Option<CacheMode>,
}
impl RequestConfig {
	/// Creates an empty configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a header override.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Appends a query parameter. Repeated keys are kept, never collapsed.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
		self.params.push((key.into(), value.into()));

		self
	}

	/// Appends several query parameters, preserving iteration order.
	pub fn params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<QueryValue>,
	{
		self.params.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Attaches a cancellation signal.
	pub fn signal(mut self, signal: CancelSignal) -> Self {
		self.signal = Some(signal);

		self
	}

	/// Sets the cache directive.
	pub fn cache(mut self, mode: CacheMode) -> Self {
		self.cache = Some(mode);

		self
	}
}

/// Scalar query parameter value; rendered with plain string coercion.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
	/// Text value.
	Text(String),
	/// Signed integer.
	Int(i64),
	/// Unsigned integer.
	UInt(u64),
	/// Floating-point number.
	Float(f64),
	/// Boolean, rendered as `true`/`false`.
	Bool(bool),
}
impl Display for QueryValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Text(v) => f.write_str(v),
			Self::Int(v) => write!(f, "{v}"),
			Self::UInt(v) => write!(f, "{v}"),
			Self::Float(v) => fmt_float(*v, f),
			Self::Bool(v) => write!(f, "{v}"),
		}
	}
}

// Number-to-string rules of web query strings: `-0` prints as `0`, magnitudes outside
// `[1e-6, 1e21)` use exponent form with an explicit sign.
fn fmt_float(v: f64, f: &mut Formatter) -> FmtResult {
	if v.is_nan() {
		return f.write_str("NaN");
	}
	if v.is_infinite() {
		return f.write_str(if v.is_sign_positive() { "Infinity" } else { "-Infinity" });
	}
	if v == 0.0 {
		return f.write_str("0");
	}

	let magnitude = v.abs();

	if (1e-6..1e21).contains(&magnitude) {
		return write!(f, "{v}");
	}

	let exp = format!("{v:e}");

	match exp.split_once('e') {
		Some((mantissa, power)) if !power.starts_with('-') => write!(f, "{mantissa}e+{power}"),
		_ => f.write_str(&exp),
	}
}

impl From<String> for QueryValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<&str> for QueryValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<&String> for QueryValue {
	fn from(value: &String) -> Self {
		Self::Text(value.clone())
	}
}
impl From<bool> for QueryValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<f32> for QueryValue {
	fn from(value: f32) -> Self {
		Self::Float(value.into())
	}
}
impl From<f64> for QueryValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}
macro_rules! impl_from_int {
	($variant:ident, $target:ty, $($ty:ty),+) => {
		$(
			impl From<$ty> for QueryValue {
				fn from(value: $ty) -> Self {
					Self::$variant(<$target>::from(value))
				}
			}
		)+
	};
}
impl_from_int!(Int, i64, i8, i16, i32, i64);
impl_from_int!(UInt, u64, u8, u16, u32, u64);
impl From<usize> for QueryValue {
	fn from(value: usize) -> Self {
		Self::UInt(u64::try_from(value).unwrap_or(u64::MAX))
	}
}

/// Cache directive for a request, named after the fetch cache modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
	/// Leave caching to the HTTP stack.
	Default,
	/// Bypass caches and do not store the response.
	NoStore,
	/// Bypass caches for the request but allow storing the response.
	Reload,
	/// Revalidate with the origin before using a cached response.
	NoCache,
	/// Accept a cached response regardless of staleness.
	ForceCache,
	/// Only accept a cached response.
	OnlyIfCached,
}
impl CacheMode {
	/// `Cache-Control` request directive for this mode, if any.
	pub const fn cache_control(self) -> Option<&'static str> {
		match self {
			Self::Default => None,
			Self::NoStore => Some("no-store"),
			Self::Reload | Self::NoCache => Some("no-cache"),
			Self::ForceCache => Some("max-stale"),
			Self::OnlyIfCached => Some("only-if-cached"),
		}
	}
}
