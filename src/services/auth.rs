//! Authentication service: login, registration, session refresh, password recovery, and
//! profile lookup.
//!
//! Attach a [`SharedToken`] with [`AuthService::with_session`] to keep the client's bearer
//! token in sync: successful login, registration, and refresh store the new access token,
//! and a successful logout clears it.

// self
use crate::{
	_prelude::*,
	auth::{SharedToken, TokenSecret},
	client::ApiClient,
	endpoints,
	http::{ApiTransport, ReqwestTransport},
	response::{AckReply, Reply},
};

/// Credentials for [`AuthService::login`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
}

/// Payload for [`AuthService::register`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
	/// Display name.
	pub name: String,
	/// Account email.
	pub email: String,
	/// Chosen password.
	pub password: String,
	/// Password confirmation.
	pub confirm_password: String,
}

/// Payload for [`AuthService::forgot_password`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
	/// Account email receiving the reset link.
	pub email: String,
}

/// Payload for [`AuthService::reset_password`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
	/// Reset token from the email.
	pub token: String,
	/// New password.
	pub password: String,
	/// Password confirmation.
	pub confirm_password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenRequest<'a> {
	refresh_token: &'a str,
}

/// Account role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
	/// Administrator.
	Admin,
	/// Regular user.
	User,
}

/// User profile as returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Opaque user identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Account email.
	pub email: String,
	/// Avatar URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	/// Account role.
	pub role: UserRole,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// Session tokens issued on login, registration, and refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
	/// Bearer token for API calls.
	pub access_token: TokenSecret,
	/// Token used to obtain a new access token.
	pub refresh_token: TokenSecret,
	/// Access token lifetime in seconds.
	pub expires_in: u64,
}

/// Result of a successful login, registration, or refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
	/// Authenticated user.
	pub user: User,
	/// Issued tokens.
	pub tokens: AuthTokens,
}

/// Authentication calls against the [`endpoints::auth`] and profile endpoints.
pub struct AuthService<T = ReqwestTransport>
where
	T: ?Sized + ApiTransport,
{
	client: ApiClient<T>,
	session: Option<SharedToken>,
}
impl<T> AuthService<T>
where
	T: ?Sized + ApiTransport,
{
	/// Wraps a client.
	pub fn new(client: ApiClient<T>) -> Self {
		Self { client, session: None }
	}

	/// Keeps `session` updated with the access token from successful auth calls.
	pub fn with_session(mut self, session: SharedToken) -> Self {
		self.session = Some(session);

		self
	}

	/// Underlying client.
	pub fn client(&self) -> &ApiClient<T> {
		&self.client
	}

	/// Authenticates with email and password.
	pub async fn login(&self, request: &LoginRequest) -> Result<Reply<AuthResponse>> {
		let reply = self.client.post(endpoints::auth::LOGIN, Some(request), None).await?;

		self.store_session(&reply);

		Ok(reply)
	}

	/// Creates a new account.
	pub async fn register(&self, request: &RegisterRequest) -> Result<Reply<AuthResponse>> {
		let reply = self.client.post(endpoints::auth::REGISTER, Some(request), None).await?;

		self.store_session(&reply);

		Ok(reply)
	}

	/// Invalidates the current session on the server.
	pub async fn logout(&self) -> Result<AckReply> {
		let reply = self.client.post::<_, ()>(endpoints::auth::LOGOUT, None, None).await?;

		if let Some(session) = &self.session {
			session.clear();
		}

		Ok(reply)
	}

	/// Exchanges a refresh token for a new token pair.
	pub async fn refresh_token(&self, refresh_token: &str) -> Result<Reply<AuthResponse>> {
		let body = RefreshTokenRequest { refresh_token };
		let reply = self.client.post(endpoints::auth::REFRESH_TOKEN, Some(&body), None).await?;

		self.store_session(&reply);

		Ok(reply)
	}

	/// Sends a password-reset email.
	pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<AckReply> {
		self.client.post(endpoints::auth::FORGOT_PASSWORD, Some(request), None).await
	}

	/// Sets a new password using a reset token.
	pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<AckReply> {
		self.client.post(endpoints::auth::RESET_PASSWORD, Some(request), None).await
	}

	/// Fetches the authenticated user's profile.
	pub async fn profile(&self) -> Result<Reply<User>> {
		self.client.get(endpoints::users::PROFILE, None).await
	}

	fn store_session(&self, reply: &Reply<AuthResponse>) {
		if let (Some(session), Some(envelope)) = (&self.session, reply.envelope()) {
			session.replace(envelope.data.tokens.access_token.clone());
		}
	}
}
impl<T> Debug for AuthService<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthService")
			.field("client", &self.client)
			.field("session_set", &self.session.is_some())
			.finish()
	}
}
