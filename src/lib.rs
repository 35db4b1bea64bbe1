//! Minimal OAuth 2.0 authorization code login: redirect the browser to the provider, exchange the
//! returned code for a token, fetch the user profile, and answer with both as JSON.

#![deny(clippy::all, missing_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod server;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ProviderId, ScopeList},
		config::OAuthClientConfig,
		flows::ReqwestOAuthClient,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		provider::{ClientAuthMethod, ProviderDescriptor},
	};

	/// Client identifier used by test configurations.
	pub const TEST_CLIENT_ID: &str = "client-it";
	/// Client secret used by test configurations.
	pub const TEST_CLIENT_SECRET: &str = "secret-it";
	/// Redirect URI used by test configurations.
	pub const TEST_REDIRECT_URI: &str = "http://localhost:8080/callback";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.timeout(StdDuration::from_secs(5))
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a descriptor whose endpoints live under `base` (typically an `httpmock` server).
	pub fn test_descriptor(base: &str) -> ProviderDescriptor {
		let url = |path: &str| {
			Url::parse(&format!("{}{path}", base.trim_end_matches('/')))
				.expect("Failed to parse mock provider URL.")
		};

		ProviderDescriptor::builder(
			ProviderId::new("mock-provider").expect("Mock provider identifier should be valid."),
		)
		.authorization_endpoint(url("/authorize"))
		.token_endpoint(url("/token"))
		.profile_endpoint(url("/me"))
		.preferred_client_auth_method(ClientAuthMethod::ClientSecretPost)
		.build()
		.expect("Mock provider descriptor should build.")
	}

	/// Builds a client configuration pointing at the provided descriptor.
	pub fn test_client_config(descriptor: ProviderDescriptor) -> OAuthClientConfig {
		OAuthClientConfig::new(
			descriptor,
			TEST_CLIENT_ID,
			TEST_CLIENT_SECRET,
			Url::parse(TEST_REDIRECT_URI).expect("Test redirect URI should parse."),
			ScopeList::new(["User.Read", "profile", "openid", "email"])
				.expect("Test scopes should be valid."),
		)
	}

	/// Constructs a reqwest-backed [`ReqwestOAuthClient`] for the provider living under `base`.
	pub fn build_reqwest_test_client(base: &str) -> ReqwestOAuthClient {
		let config = test_client_config(test_descriptor(base));

		ReqwestOAuthClient::with_http_client(
			config,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
