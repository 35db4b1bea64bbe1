//! Login flow orchestration: the authorization redirect, the callback exchange, and the profile
//! request.

pub mod authorize;
pub mod callback;
pub mod profile;

pub use authorize::*;
pub use callback::*;

// self
use crate::{
	_prelude::*,
	config::OAuthClientConfig,
	http::{ProviderHttpClient, ReqwestHttpClient},
	oauth::{BasicFacade, ReqwestTransportErrorMapper, TransportErrorMapper},
};

/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestOAuthClient = OAuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Runs the authorization code flow against a single provider configuration.
///
/// The client owns the HTTP transport, the transport error mapper, and the immutable
/// [`OAuthClientConfig`]. Cloning is cheap and every clone shares the same transport, so one
/// instance serves every concurrent request.
#[derive(Clone)]
pub struct OAuthClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Client identity and provider endpoints.
	pub config: Arc<OAuthClientConfig>,
}
impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: impl Into<Arc<OAuthClientConfig>>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), config: config.into() }
	}

	fn facade(&self) -> Result<BasicFacade<C, M>> {
		BasicFacade::from_config(&self.config, self.http_client.clone(), self.transport_mapper.clone())
	}
}
impl OAuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client with its own reqwest transport; every outbound call is bounded by
	/// `timeout` and never follows redirects.
	pub fn new(config: OAuthClientConfig, timeout: StdDuration) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(timeout)?;

		Ok(Self::with_http_client(config, http_client, ReqwestTransportErrorMapper))
	}
}
impl<C, M> Debug for OAuthClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient").field("config", &self.config).finish()
	}
}
