//! Thin facade over the `oauth2` crate for the authorization code exchange.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenType},
};
// self
use crate::{
	_prelude::*,
	auth::Token,
	config::OAuthClientConfig,
	error::{ConfigError, ExchangeError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot, UpstreamEndpoint},
	provider::ClientAuthMethod,
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeTokenResponse = oauth2::basic::BasicTokenResponse;

/// Maps HTTP transport failures into [`TransportError`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport while calling `endpoint`.
	fn map_transport_error(
		&self,
		endpoint: UpstreamEndpoint,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> TransportError;
}

/// Default mapper for reqwest-backed transports.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: UpstreamEndpoint,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> TransportError {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, *inner),
			HttpClientError::Http(source) => TransportError::Request { endpoint, source },
			HttpClientError::Io(source) => TransportError::Io { endpoint, source },
			HttpClientError::Other(message) =>
				TransportError::Other { endpoint, message, status: meta_status(meta) },
			_ => TransportError::Other {
				endpoint,
				message: "unrecognized transport failure".into(),
				status: meta_status(meta),
			},
		}
	}
}

pub(crate) struct BasicFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> BasicFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn from_config(
		config: &OAuthClientConfig,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let auth_url = AuthUrl::from_url(config.authorize_url().clone());
		let token_url = TokenUrl::new(config.token_url().to_string())
			.map_err(|source| ConfigError::InvalidTokenEndpoint { source })?;
		let redirect_url = RedirectUrl::new(config.redirect_uri.to_string())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.clone()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			.set_redirect_uri(redirect_url);

		if matches!(config.descriptor.preferred_client_auth_method, ClientAuthMethod::ClientSecretPost)
		{
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self { oauth_client, http_client: http_client.into(), error_mapper: error_mapper.into() })
	}

	/// Redeems `code` at the token endpoint (`grant_type=authorization_code`).
	pub(crate) async fn exchange_authorization_code(&self, code: &str) -> Result<Token> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err, self.error_mapper.as_ref()))?;

		Ok(map_token_response(response, OffsetDateTime::now_utc())?)
	}
}

fn map_token_response(
	response: FacadeTokenResponse,
	issued_at: OffsetDateTime,
) -> Result<Token, ExchangeError> {
	let token_type = match response.token_type() {
		BasicTokenType::Bearer => "Bearer".to_owned(),
		other => other.as_ref().to_owned(),
	};
	let mut token = Token::bearer(response.access_token().secret().to_owned());

	token.token_type = token_type;

	if let Some(refresh) = response.refresh_token() {
		token = token.with_refresh_token(refresh.secret().to_owned());
	}
	if let Some(expires_in) = response.expires_in() {
		let expiry = i64::try_from(expires_in.as_secs())
			.ok()
			.and_then(|secs| issued_at.checked_add(Duration::seconds(secs)))
			.ok_or_else(|| ExchangeError::UnexpectedResponse {
				message: "expires_in exceeds the supported range".into(),
				status: None,
			})?;

		token = token.with_expiry(expiry);
	}

	Ok(token)
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> ExchangeError
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, meta_ref),
		RequestTokenError::Request(error) =>
			mapper.map_transport_error(UpstreamEndpoint::Token, meta_ref, error).into(),
		RequestTokenError::Parse(source, _body) =>
			ExchangeError::MalformedResponse { source, status: meta_status(meta_ref) },
		RequestTokenError::Other(message) =>
			ExchangeError::UnexpectedResponse { message, status: meta_status(meta_ref) },
	}
}

fn map_server_response_error(
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> ExchangeError {
	ExchangeError::Rejected {
		error: response.error().as_ref().to_owned(),
		description: response.error_description().cloned(),
		status: meta_status(meta),
	}
}

fn map_reqwest_error(endpoint: UpstreamEndpoint, err: ReqwestError) -> TransportError {
	if err.is_timeout() {
		return TransportError::Timeout { endpoint };
	}

	TransportError::network(endpoint, err)
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::{AccessToken, EmptyExtraTokenFields, RefreshToken, basic::BasicTokenResponse};
	use time::macros;
	// self
	use super::*;
	use crate::{
		_preludet::{test_client_config, test_descriptor},
		http::ReqwestHttpClient,
	};

	#[test]
	fn builds_post_auth_client() {
		let config = test_client_config(test_descriptor("https://login.example.com"));
		let result = <BasicFacade<ReqwestHttpClient, ReqwestTransportErrorMapper>>::from_config(
			&config,
			Arc::new(ReqwestHttpClient::default()),
			Arc::new(ReqwestTransportErrorMapper),
		);

		assert!(result.is_ok());
	}

	#[test]
	fn token_response_maps_expiry_and_refresh() {
		let mut response = BasicTokenResponse::new(
			AccessToken::new("access".into()),
			BasicTokenType::Bearer,
			EmptyExtraTokenFields {},
		);

		response.set_refresh_token(Some(RefreshToken::new("refresh".into())));
		response.set_expires_in(Some(&StdDuration::from_secs(3600)));

		let issued_at = macros::datetime!(2025-01-01 00:00 UTC);
		let token = map_token_response(response, issued_at).expect("Token should map.");

		assert_eq!(token.access_token.expose(), "access");
		assert_eq!(token.token_type, "Bearer");
		assert_eq!(token.refresh_token.as_ref().map(|secret| secret.expose()), Some("refresh"));
		assert_eq!(token.expiry, Some(macros::datetime!(2025-01-01 01:00 UTC)));
	}

	#[test]
	fn token_response_without_expiry_keeps_it_empty() {
		let response = BasicTokenResponse::new(
			AccessToken::new("access".into()),
			BasicTokenType::Extension("pop".into()),
			EmptyExtraTokenFields {},
		);
		let token =
			map_token_response(response, OffsetDateTime::now_utc()).expect("Token should map.");

		assert_eq!(token.token_type, "pop");
		assert!(token.refresh_token.is_none());
		assert!(token.expiry.is_none());
	}

	#[test]
	fn other_transport_errors_keep_recorded_status() {
		let err = ReqwestTransportErrorMapper.map_transport_error(
			UpstreamEndpoint::Profile,
			Some(&ResponseMetadata { status: Some(503) }),
			HttpClientError::Other("connection reset".into()),
		);

		assert!(matches!(
			err,
			TransportError::Other { endpoint: UpstreamEndpoint::Profile, status: Some(503), .. }
		));
	}
}
