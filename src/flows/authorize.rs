//! Authorization redirect construction.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
// self
use crate::{
	_prelude::*,
	config::OAuthClientConfig,
	flows::OAuthClient,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const STATE_BYTES: usize = 32;

/// Authorization redirect returned by [`OAuthClient::start_authorization`].
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
	/// Provider authorize URL the browser is sent to.
	pub authorize_url: Url,
	/// Opaque CSRF value embedded in `authorize_url`; must round-trip through the callback.
	pub state: String,
}

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the provider authorization URL with a fresh `state` value.
	///
	/// Construction cannot fail once the configuration has been validated.
	pub fn start_authorization(&self) -> AuthorizationRequest {
		const KIND: FlowKind = FlowKind::Authorization;

		let _guard = FlowSpan::new(KIND, "start_authorization").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let state = generate_state();
		let authorize_url = build_authorize_url(&self.config, &state);

		tracing::debug!(
			authorize_url = %self.config.authorize_url(),
			"Authorization redirect built."
		);
		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		AuthorizationRequest { authorize_url, state }
	}
}

/// Generates a CSRF `state` value: 32 random bytes, base64url without padding.
pub fn generate_state() -> String {
	let mut bytes = [0_u8; STATE_BYTES];

	rand::rng().fill_bytes(&mut bytes);

	URL_SAFE_NO_PAD.encode(bytes)
}

fn build_authorize_url(config: &OAuthClientConfig, state: &str) -> Url {
	let descriptor = &config.descriptor;
	let mut url = config.authorize_url().clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", &config.client_id);
	pairs.append_pair("redirect_uri", config.redirect_uri.as_str());

	if let Some(scope) = config.scopes.joined(descriptor.quirks.scope_delimiter) {
		pairs.append_pair("scope", &scope);
	}

	pairs.append_pair("state", state);

	if descriptor.quirks.offline_access_hint {
		pairs.append_pair("access_type", "offline");
	}

	drop(pairs);

	url
}
