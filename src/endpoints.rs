//! Registry of API endpoint paths.
//!
//! Paths are relative; the client resolves them against its configured base URL. Static paths
//! are constants and parameterized paths are functions.

/// Authentication endpoints.
pub mod auth {
	/// Exchanges credentials for a session.
	pub const LOGIN: &str = "/auth/login";
	/// Creates an account.
	pub const REGISTER: &str = "/auth/register";
	/// Invalidates the current session.
	pub const LOGOUT: &str = "/auth/logout";
	/// Exchanges a refresh token for new tokens.
	pub const REFRESH_TOKEN: &str = "/auth/refresh-token";
	/// Sends a password-reset email.
	pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
	/// Sets a new password from a reset token.
	pub const RESET_PASSWORD: &str = "/auth/reset-password";
}

/// User endpoints.
pub mod users {
	/// Lists users.
	pub const LIST: &str = "/users";
	/// The authenticated user's profile.
	pub const PROFILE: &str = "/users/profile";

	/// A single user; also the target for updates and deletion.
	pub fn detail(id: &str) -> String {
		format!("{LIST}/{id}")
	}
}
