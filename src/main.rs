//! `oauth2-login` binary: serves the login redirect and the callback.

// std
use std::sync::Arc;
// crates.io
use tokio::net::TcpListener;
// self
use oauth2_login::{
	config::Settings,
	flows::ReqwestOAuthClient,
	obs,
	server::{self, LoginHandlers},
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let (settings, env_file) = Settings::load();

	obs::init_tracing(&settings.log_level, settings.json_logs)?;

	if let Some(path) = env_file {
		tracing::info!(path = %path.display(), "Loaded environment file.");
	}

	let config = settings.client_config()?;

	tracing::info!(
		version = env!("CARGO_PKG_VERSION"),
		client_id = %config.client_id,
		redirect_uri = %config.redirect_uri,
		scopes = %config.scopes,
		"Starting OAuth 2.0 login server."
	);

	let client = ReqwestOAuthClient::new(config, settings.http_timeout())?;
	let handlers = Arc::new(LoginHandlers::new(client, settings.server_options()));
	let listener = TcpListener::bind(settings.listen_addr()?).await?;

	server::serve(listener, server::router(handlers)).await?;

	Ok(())
}
