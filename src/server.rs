//! HTTP surface: `GET /` starts the login, `GET /callback` completes it.

// crates.io
use axum::{
	Router,
	extract::{Query, State},
	http::{HeaderMap, StatusCode, header},
	response::{IntoResponse, Response},
	routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
// self
use crate::{
	_prelude::*,
	config::CALLBACK_PATH,
	error::ConfigError,
	flows::{CallbackParams, ReqwestOAuthClient},
};

/// Cookie binding the issued `state` to the browser between redirect and callback.
pub const STATE_COOKIE: &str = "oauth2_login_state";

const STATE_COOKIE_TTL: Duration = Duration::minutes(10);

/// Response behavior of the HTTP surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServerOptions {
	/// Answer failures with the full error chain instead of the top-level message.
	pub expose_error_details: bool,
}

/// Request handlers sharing one immutable client.
#[derive(Debug)]
pub struct LoginHandlers {
	client: ReqwestOAuthClient,
	options: ServerOptions,
}
impl LoginHandlers {
	/// Wraps `client` with the given response options.
	pub fn new(client: ReqwestOAuthClient, options: ServerOptions) -> Self {
		Self { client, options }
	}

	/// Redirects the browser to the provider and binds the fresh `state` to it.
	///
	/// The state cookie is host-only and must be set on the host the callback returns to. A
	/// request whose `host` differs from the redirect URI's is sent to that origin first.
	pub fn authorize(&self, host: Option<&str>, jar: CookieJar) -> Response {
		let redirect_uri = &self.client.config.redirect_uri;

		if let (Some(host), Some(expected)) = (host, redirect_authority(redirect_uri)) {
			if !host.eq_ignore_ascii_case(&expected) {
				let origin = format!("{}://{expected}/", redirect_uri.scheme());

				tracing::debug!(%host, %origin, "Redirecting to the callback origin before login.");

				return (StatusCode::FOUND, [(header::LOCATION, origin)]).into_response();
			}
		}

		let request = self.client.start_authorization();
		let cookie = Cookie::build((STATE_COOKIE, request.state))
			.path("/")
			.http_only(true)
			.same_site(SameSite::Lax)
			.max_age(STATE_COOKIE_TTL);

		(
			StatusCode::FOUND,
			[(header::LOCATION, request.authorize_url.to_string())],
			jar.add(cookie),
		)
			.into_response()
	}

	/// Verifies the state cookie, runs the exchange and profile request, and answers with
	/// `{"token": {...}, "user": {...}}`.
	///
	/// The state cookie is cleared on every outcome.
	pub async fn callback(&self, jar: CookieJar, params: CallbackParams) -> Response {
		let expected_state = jar.get(STATE_COOKIE).map(|cookie| cookie.value().to_owned());
		let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/"));
		let result = self
			.client
			.complete_authorization(&params, expected_state.as_deref())
			.await
			.and_then(|outcome| outcome.to_json());

		match result {
			Ok(body) =>
				(StatusCode::OK, jar, [(header::CONTENT_TYPE, "application/json")], body)
					.into_response(),
			Err(err) => (jar, self.error_response(&err)).into_response(),
		}
	}

	fn error_response(&self, err: &Error) -> Response {
		let status = error_status(err);
		let detail = err.chain_message();

		if status.is_client_error() {
			tracing::warn!(status = status.as_u16(), error = %detail, "Callback rejected.");
		} else {
			tracing::error!(status = status.as_u16(), error = %detail, "Callback failed.");
		}

		(status, self.error_body(err)).into_response()
	}

	fn error_body(&self, err: &Error) -> String {
		if self.options.expose_error_details { err.chain_message() } else { err.to_string() }
	}
}

/// Builds the router serving both endpoints.
pub fn router(handlers: Arc<LoginHandlers>) -> Router {
	Router::new()
		.route("/", get(authorize))
		.route(CALLBACK_PATH, get(callback))
		.layer(TraceLayer::new_for_http())
		.with_state(handlers)
}

/// Serves `router` on `listener` until Ctrl-C is received.
pub async fn serve(listener: TcpListener, router: Router) -> Result<(), ConfigError> {
	if let Ok(addr) = listener.local_addr() {
		tracing::info!(%addr, "Listening.");
	}

	axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

	tracing::info!("Server stopped.");

	Ok(())
}

/// Maps a flow error onto the HTTP status returned to the browser.
pub fn error_status(err: &Error) -> StatusCode {
	match err {
		Error::InvalidState { .. } => StatusCode::BAD_REQUEST,
		_ => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

async fn authorize(
	State(handlers): State<Arc<LoginHandlers>>,
	headers: HeaderMap,
	jar: CookieJar,
) -> Response {
	let host = headers.get(header::HOST).and_then(|value| value.to_str().ok());

	handlers.authorize(host, jar)
}

async fn callback(
	State(handlers): State<Arc<LoginHandlers>>,
	jar: CookieJar,
	Query(params): Query<CallbackParams>,
) -> Response {
	handlers.callback(jar, params).await
}

/// `host[:port]` of `url`, with the port omitted when it is the scheme default.
fn redirect_authority(url: &Url) -> Option<String> {
	let host = url.host_str()?;

	Some(match url.port() {
		Some(port) => format!("{host}:{port}"),
		None => host.to_owned(),
	})
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %err, "Ctrl-C handler could not be installed.");

		std::future::pending::<()>().await;
	}

	tracing::info!("Shutdown requested.");
}
