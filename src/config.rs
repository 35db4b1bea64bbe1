//! Start-up configuration: command-line flags with environment (and `.env`) fallbacks, and the
//! immutable client configuration derived from them.

// std
use std::{
	net::{SocketAddr, ToSocketAddrs},
	path::PathBuf,
};
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	auth::{ScopeList, TenantId},
	error::ConfigError,
	provider::{ProviderDescriptor, microsoft},
	server::ServerOptions,
};

/// Path served by the callback handler.
pub const CALLBACK_PATH: &str = "/callback";

/// Flags and environment variables accepted by the `oauth2-login` binary.
#[derive(Clone, Parser)]
#[command(
	name = "oauth2-login",
	version,
	about = "OAuth 2.0 authorization code login against Microsoft Entra ID."
)]
pub struct Settings {
	/// Application (client) identifier.
	#[arg(long, env = "AZURE_CLIENT_ID")]
	pub client_id: String,
	/// Client secret used at the token endpoint.
	#[arg(long, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
	pub client_secret: String,
	/// Directory tenant (GUID, verified domain, `common`, or `organizations`).
	#[arg(long, env = "AZURE_TENANT_ID")]
	pub tenant_id: TenantId,
	/// Authority host the tenant endpoints live under.
	#[arg(long, env = "AZURE_AUTHORITY", default_value = microsoft::DEFAULT_AUTHORITY)]
	pub authority: Url,
	/// Protected endpoint returning the signed-in user.
	#[arg(long, env = "OAUTH_PROFILE_URL", default_value = microsoft::DEFAULT_PROFILE_URL)]
	pub profile_url: Url,
	/// Interface to listen on.
	#[arg(long, env = "OAUTH_BIND", default_value = "127.0.0.1")]
	pub bind: String,
	/// Port to listen on.
	#[arg(long, env = "PORT", default_value_t = 8080)]
	pub port: u16,
	/// Redirect URI registered with the provider [default: http://localhost:<port>/callback].
	#[arg(long, env = "OAUTH_REDIRECT_URI")]
	pub redirect_uri: Option<Url>,
	/// Space- or comma-separated scopes [default: User.Read profile openid email].
	#[arg(long, env = "OAUTH_SCOPES")]
	pub scopes: Option<ScopeList>,
	/// Upper bound for each outbound provider call, in seconds.
	#[arg(long, env = "OAUTH_HTTP_TIMEOUT_SECS", default_value_t = 10)]
	pub timeout_secs: u64,
	/// Return the full error chain to the browser instead of a generic message.
	#[arg(long, env = "OAUTH_EXPOSE_ERROR_DETAILS", default_value_t = false)]
	pub expose_error_details: bool,
	/// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence.
	#[arg(long, default_value = "info")]
	pub log_level: String,
	/// Output logs as JSON instead of human-readable.
	#[arg(long, default_value_t = false)]
	pub json_logs: bool,
}
impl Settings {
	/// Loads `.env` from the working directory (if any) and parses the process arguments.
	///
	/// Returns the `.env` path that was applied so it can be logged once tracing is up.
	pub fn load() -> (Self, Option<PathBuf>) {
		let env_file = dotenvy::dotenv().ok();

		(Self::parse(), env_file)
	}

	/// Redirect URI sent to the provider.
	pub fn redirect_uri(&self) -> Result<Url, ConfigError> {
		match &self.redirect_uri {
			Some(uri) => Ok(uri.clone()),
			None => Url::parse(&format!("http://localhost:{}{CALLBACK_PATH}", self.port))
				.map_err(|source| ConfigError::InvalidRedirect { source }),
		}
	}

	/// Resolves the listen address.
	pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
		let invalid = || ConfigError::InvalidListenAddress {
			address: format!("{}:{}", self.bind, self.port),
		};

		(self.bind.as_str(), self.port)
			.to_socket_addrs()
			.map_err(|_| invalid())?
			.next()
			.ok_or_else(invalid)
	}

	/// Timeout applied to each outbound call.
	pub fn http_timeout(&self) -> StdDuration {
		StdDuration::from_secs(self.timeout_secs.max(1))
	}

	/// Response behavior of the HTTP surface.
	pub fn server_options(&self) -> ServerOptions {
		ServerOptions { expose_error_details: self.expose_error_details }
	}

	/// Builds the immutable client configuration.
	pub fn client_config(&self) -> Result<OAuthClientConfig> {
		ensure_present("client id", &self.client_id)?;
		ensure_present("client secret", &self.client_secret)?;

		let descriptor =
			microsoft::descriptor(&self.authority, &self.tenant_id, self.profile_url.clone())
				.map_err(ConfigError::from)?;
		let scopes = match &self.scopes {
			Some(scopes) if !scopes.is_empty() => scopes.clone(),
			_ => ScopeList::new(microsoft::DEFAULT_SCOPES).map_err(ConfigError::from)?,
		};

		Ok(OAuthClientConfig::new(
			descriptor,
			self.client_id.trim(),
			self.client_secret.as_str(),
			self.redirect_uri()?,
			scopes,
		))
	}
}

impl Debug for Settings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Settings")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("tenant_id", &self.tenant_id)
			.field("authority", &self.authority)
			.field("profile_url", &self.profile_url)
			.field("bind", &self.bind)
			.field("port", &self.port)
			.field("redirect_uri", &self.redirect_uri)
			.field("scopes", &self.scopes)
			.field("timeout_secs", &self.timeout_secs)
			.field("expose_error_details", &self.expose_error_details)
			.field("log_level", &self.log_level)
			.field("json_logs", &self.json_logs)
			.finish()
	}
}

/// Client identity and provider endpoints; read-only once built.
#[derive(Clone)]
pub struct OAuthClientConfig {
	/// Provider endpoints and quirks.
	pub descriptor: ProviderDescriptor,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: String,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Url,
	/// Requested scopes, in request order.
	pub scopes: ScopeList,
}
impl OAuthClientConfig {
	/// Assembles a configuration from its parts.
	pub fn new(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: Url,
		scopes: ScopeList,
	) -> Self {
		Self {
			descriptor,
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			redirect_uri,
			scopes,
		}
	}

	/// Provider authorization endpoint.
	pub fn authorize_url(&self) -> &Url {
		&self.descriptor.endpoints.authorization
	}

	/// Provider token endpoint.
	pub fn token_url(&self) -> &Url {
		&self.descriptor.endpoints.token
	}

	/// Provider profile endpoint.
	pub fn profile_url(&self) -> &Url {
		&self.descriptor.endpoints.profile
	}
}
impl Debug for OAuthClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClientConfig")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("redirect_uri", &self.redirect_uri)
			.field("scopes", &self.scopes)
			.finish()
	}
}

fn ensure_present(name: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.trim().is_empty() {
		Err(ConfigError::MissingCredential { name })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn parse(extra: &[&str]) -> Settings {
		let mut args = vec![
			"oauth2-login",
			"--client-id",
			"app-123",
			"--client-secret",
			"shh",
			"--tenant-id",
			"contoso.onmicrosoft.com",
		];

		args.extend_from_slice(extra);

		Settings::try_parse_from(args).expect("Settings fixture should parse.")
	}

	#[test]
	fn defaults_mirror_the_local_setup() {
		let settings = parse(&[]);
		let config = settings.client_config().expect("Client config should build.");

		assert_eq!(config.redirect_uri.as_str(), "http://localhost:8080/callback");
		assert_eq!(
			config.authorize_url().as_str(),
			"https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/authorize"
		);
		assert_eq!(config.profile_url().as_str(), microsoft::DEFAULT_PROFILE_URL);
		assert_eq!(config.scopes.joined(' ').as_deref(), Some("User.Read profile openid email"));
		assert_eq!(settings.http_timeout(), StdDuration::from_secs(10));
		assert_eq!(
			settings.listen_addr().expect("Default listen address should resolve."),
			SocketAddr::from(([127, 0, 0, 1], 8080))
		);
		assert!(!settings.server_options().expose_error_details);
	}

	#[test]
	fn port_flows_into_the_redirect_uri() {
		let settings = parse(&["--port", "9090"]);

		assert_eq!(
			settings.redirect_uri().expect("Redirect URI should build.").as_str(),
			"http://localhost:9090/callback"
		);
	}

	#[test]
	fn explicit_overrides_win() {
		let settings = parse(&[
			"--redirect-uri",
			"https://app.example.com/callback",
			"--scopes",
			"openid,offline_access",
			"--timeout-secs",
			"0",
		]);
		let config = settings.client_config().expect("Client config should build.");

		assert_eq!(config.redirect_uri.as_str(), "https://app.example.com/callback");
		assert_eq!(config.scopes.joined(' ').as_deref(), Some("openid offline_access"));
		assert_eq!(settings.http_timeout(), StdDuration::from_secs(1));
	}

	#[test]
	fn blank_credentials_are_rejected() {
		let settings = Settings::try_parse_from([
			"oauth2-login",
			"--client-id",
			"app-123",
			"--client-secret",
			"  ",
			"--tenant-id",
			"common",
		])
		.expect("Blank values still parse.");
		let err = settings.client_config().expect_err("Blank secret must be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::MissingCredential { name: "client secret" })
		));
	}

	#[test]
	fn invalid_tenant_fails_to_parse() {
		let result = Settings::try_parse_from([
			"oauth2-login",
			"--client-id",
			"app",
			"--client-secret",
			"shh",
			"--tenant-id",
			"../evil",
		]);

		assert!(result.is_err());
	}

	#[test]
	fn debug_redacts_the_secret() {
		let settings = parse(&[]);
		let config = settings.client_config().expect("Client config should build.");

		assert!(!format!("{settings:?}").contains("shh"));
		assert!(!format!("{config:?}").contains("shh"));
	}
}
