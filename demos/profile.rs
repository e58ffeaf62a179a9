//! Logs in against the API configured through `API_BASE_URL`, then fetches the profile with the
//! issued bearer token.
//!
//! ```sh
//! API_BASE_URL=https://api.example.com DEMO_EMAIL=ada@example.com DEMO_PASSWORD=secret \
//!     cargo run --example profile
//! ```

// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use envelope_client::{
	auth::SharedToken,
	client::ApiClient,
	config::ClientConfig,
	presenter::{ErrorPresenter, RecordingNotifier},
	services::{AuthService, LoginRequest},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::from_env()?;
	let session = SharedToken::default();
	let client = ApiClient::from_config(&config)?.with_token_supplier(session.clone());
	let auth = AuthService::new(client).with_session(session);
	let presenter = ErrorPresenter::new(RecordingNotifier::default());
	let request = LoginRequest {
		email: std::env::var("DEMO_EMAIL")?,
		password: std::env::var("DEMO_PASSWORD")?,
	};

	if let Err(e) = auth.login(&request).await {
		let api = presenter.present(&e, Some("Login failed."));

		for (field, message) in api.iter().flat_map(envelope_client::presenter::validation_errors) {
			println!("  {field}: {message}");
		}

		return Err(eyre!("{}", presenter.notifier.messages().join("\n")));
	}

	match auth.profile().await {
		Ok(reply) => match reply.into_data() {
			Some(user) => println!("Signed in as {} <{}> ({:?}).", user.name, user.email, user.role),
			None => println!("Profile endpoint returned no content."),
		},
		Err(e) => println!("{}", presenter.message(&e, None)),
	}

	Ok(())
}
