// self
use oauth2_login::{
	_preludet::*,
	auth::Token,
	error::{ExchangeError, ProfileFetchError, TransportError},
	flows::OAuthClient,
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot, UpstreamEndpoint},
	oauth::{
		TransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
	},
};

#[derive(Debug)]
enum FakeTransportError {
	Throttled,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Throttled => write!(f, "Transport throttled."),
		}
	}
}
impl StdError for FakeTransportError {}

#[derive(Clone, Copy)]
struct FakeHttpClient {
	status: u16,
}
impl ProviderHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		FakeHttpHandle { slot, status: self.status }
	}
}

struct FakeHttpHandle {
	slot: ResponseMetadataSlot,
	status: u16,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, _request: HttpRequest) -> Self::Future {
		let slot = self.slot.clone();
		let status = self.status;

		Box::pin(async move {
			assert!(
				slot.take().is_none(),
				"ResponseMetadataSlot must be clear before dispatching a request."
			);
			slot.store(ResponseMetadata { status: Some(status) });

			Err(HttpClientError::Reqwest(Box::new(FakeTransportError::Throttled)))
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	calls: Arc<Mutex<Vec<(UpstreamEndpoint, Option<ResponseMetadata>)>>>,
}
impl RecordingTransportErrorMapper {
	fn recorded(&self) -> Vec<(UpstreamEndpoint, Option<ResponseMetadata>)> {
		self.calls.lock().clone()
	}
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: UpstreamEndpoint,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<FakeTransportError>,
	) -> TransportError {
		self.calls.lock().push((endpoint, meta.cloned()));

		TransportError::Other {
			endpoint,
			message: format!("Fake transport error: {err}"),
			status: meta.and_then(|value| value.status),
		}
	}
}

fn fake_client(
	status: u16,
	mapper: RecordingTransportErrorMapper,
) -> OAuthClient<FakeHttpClient, RecordingTransportErrorMapper> {
	OAuthClient::with_http_client(
		test_client_config(test_descriptor("https://login.example.com")),
		FakeHttpClient { status },
		mapper,
	)
}

#[tokio::test]
async fn token_transport_errors_surface_recorded_status() {
	let mapper = RecordingTransportErrorMapper::default();
	let client = fake_client(429, mapper.clone());
	let err = client.exchange_code("code").await.expect_err("Fake transport should fail.");

	match &err {
		Error::Exchange(exchange) => {
			assert_eq!(exchange.status(), Some(429));
			assert!(matches!(
				exchange,
				ExchangeError::Transport(TransportError::Other {
					endpoint: UpstreamEndpoint::Token,
					..
				})
			));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert_eq!(
		mapper.recorded(),
		vec![(UpstreamEndpoint::Token, Some(ResponseMetadata { status: Some(429) }))]
	);
	assert!(err.chain_message().contains("Fake transport error: request failed"));
}

#[tokio::test]
async fn profile_transport_errors_use_the_profile_endpoint() {
	let mapper = RecordingTransportErrorMapper::default();
	let client = fake_client(503, mapper.clone());
	let err = client
		.fetch_profile(&Token::bearer("access"))
		.await
		.expect_err("Fake transport should fail.");

	assert!(matches!(
		err,
		Error::ProfileFetch(ProfileFetchError::Transport(TransportError::Other {
			endpoint: UpstreamEndpoint::Profile,
			status: Some(503),
			..
		}))
	));
	assert_eq!(
		mapper.recorded(),
		vec![(UpstreamEndpoint::Profile, Some(ResponseMetadata { status: Some(503) }))]
	);
}
