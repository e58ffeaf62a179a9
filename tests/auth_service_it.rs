// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use envelope_client::{
	_preludet::*,
	auth::{SharedToken, TokenSecret, TokenSupplier},
	services::auth::{AuthService, LoginRequest, UserRole},
};

#[tokio::test]
async fn login_then_profile_reuses_session_token() {
	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.json_body(json!({ "email": "ada@example.com", "password": "hunter2" }));
			then.status(200).json_body(json!({
				"data": {
					"user": {
						"id": "u-1",
						"name": "Ada",
						"email": "ada@example.com",
						"role": "user",
						"createdAt": "2026-02-26T10:00:00Z",
					},
					"tokens": { "accessToken": "fresh", "refreshToken": "r-1", "expiresIn": 900 },
				},
				"message": "Logged in",
				"statusCode": 200,
			}));
		})
		.await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/users/profile").header("authorization", "Bearer fresh");
			then.status(200).json_body(json!({
				"data": {
					"id": "u-1",
					"name": "Ada",
					"email": "ada@example.com",
					"avatar": "https://cdn.example.com/ada.png",
					"role": "user",
					"createdAt": "2026-02-26T10:00:00Z",
				},
				"message": "",
				"statusCode": 200,
			}));
		})
		.await;
	let session = SharedToken::default();
	let client = build_reqwest_test_client(&server.base_url()).with_token_supplier(session.clone());
	let service = AuthService::new(client).with_session(session.clone());

	service
		.login(&LoginRequest { email: "ada@example.com".into(), password: "hunter2".into() })
		.await
		.expect("Login should succeed.");

	assert_eq!(session.token(), Some(TokenSecret::new("fresh")));

	let user = service
		.profile()
		.await
		.expect("Profile should succeed.")
		.into_data()
		.expect("Profile should carry an envelope.");

	login.assert_async().await;
	profile.assert_async().await;

	assert_eq!(user.role, UserRole::User);
	assert_eq!(user.avatar.as_deref(), Some("https://cdn.example.com/ada.png"));
}

#[tokio::test]
async fn unauthorized_profile_reports_status() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/users/profile");
			then.status(401).json_body(json!({ "message": "Token expired", "statusCode": 401 }));
		})
		.await;
	let service = AuthService::new(build_reqwest_test_client(&server.base_url()));
	let err = service.profile().await.expect_err("401 should fail.");
	let api = err.api().expect("401 should map to the API variant.");

	assert_eq!(api.status_code, 401);
	assert_eq!(api.message, "Token expired");
}
