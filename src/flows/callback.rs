//! Callback handling: state verification, code exchange, and the profile request.

// crates.io
use subtle::ConstantTimeEq;
// self
use crate::{
	_prelude::*,
	auth::{Token, UserProfile},
	error::{ExchangeError, SerializeError},
	flows::OAuthClient,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Query parameters the provider appends to the redirect URI.
#[derive(Clone, Default, Deserialize)]
pub struct CallbackParams {
	/// Authorization code issued by the provider.
	pub code: Option<String>,
	/// CSRF value echoed back from the authorization request.
	pub state: Option<String>,
	/// OAuth error code when the user or provider denied the request.
	pub error: Option<String>,
	/// Human-readable companion to `error`.
	pub error_description: Option<String>,
}
impl Debug for CallbackParams {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CallbackParams")
			.field("code", &self.code.as_ref().map(|_| "<redacted>"))
			.field("state", &self.state)
			.field("error", &self.error)
			.field("error_description", &self.error_description)
			.finish()
	}
}

/// Successful callback result, rendered as `{"token": {...}, "user": {...}}`.
#[derive(Clone, Debug, Serialize)]
pub struct CallbackOutcome {
	/// Token issued by the token endpoint.
	pub token: Token,
	/// Profile returned by the profile endpoint.
	pub user: UserProfile,
}
impl CallbackOutcome {
	/// Encodes the outcome as the JSON response body.
	pub fn to_json(&self) -> Result<Vec<u8>> {
		Ok(serde_json::to_vec(self).map_err(SerializeError::from)?)
	}
}

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Completes the login after the provider redirected back.
	///
	/// `expected_state` is the value bound to the browser when the flow started. The provider is
	/// only contacted once the returned `state` matches it, the redirect carries no OAuth error,
	/// and a non-empty `code` is present.
	pub async fn complete_authorization(
		&self,
		params: &CallbackParams,
		expected_state: Option<&str>,
	) -> Result<CallbackOutcome> {
		const KIND: FlowKind = FlowKind::Callback;

		let span = FlowSpan::new(KIND, "complete_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result: Result<CallbackOutcome> = span
			.instrument(async move {
				verify_state(expected_state, params.state.as_deref())?;

				if let Some(error) = &params.error {
					return Err(ExchangeError::AuthorizationDenied {
						error: error.clone(),
						description: params.error_description.clone(),
					}
					.into());
				}

				let code = params
					.code
					.as_deref()
					.filter(|code| !code.is_empty())
					.ok_or(ExchangeError::MissingCode)?;
				let token = self.exchange_code(code).await?;
				let user = self.fetch_profile(&token).await?;

				tracing::info!(user = user.display_name(), "Login completed.");

				Ok(CallbackOutcome { token, user })
			})
			.await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	/// Redeems `code` at the token endpoint.
	pub async fn exchange_code(&self, code: &str) -> Result<Token> {
		let span = FlowSpan::new(FlowKind::Callback, "exchange_code");

		span.instrument(async move { self.facade()?.exchange_authorization_code(code).await }).await
	}
}

/// Checks the returned `state` against the value bound to the browser.
pub fn verify_state(expected: Option<&str>, returned: Option<&str>) -> Result<()> {
	let reason = match (expected, returned) {
		(None, _) => "no state was issued to this browser",
		(Some(_), None) => "the callback carried no state",
		(Some(expected), Some(returned)) if constant_time_eq(expected, returned) => return Ok(()),
		(Some(_), Some(_)) => "state mismatch",
	};

	Err(Error::InvalidState { reason: reason.into() })
}

fn constant_time_eq(a: &str, b: &str) -> bool {
	a.as_bytes().ct_eq(b.as_bytes()).into()
}
