//! Login error types shared across configuration, flows, and the HTTP surface.

// self
use crate::{_prelude::*, http::UpstreamEndpoint};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// The top-level messages are deliberately coarse; the detailed cause is always reachable through
/// [`StdError::source`].
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The `state` returned by the provider does not match the one issued to the browser.
	#[error("Authorization state could not be verified: {reason}.")]
	InvalidState {
		/// Which part of the verification failed.
		reason: String,
	},
	/// Authorization code could not be exchanged for a token.
	#[error("Authorization code exchange failed.")]
	Exchange(#[from] ExchangeError),
	/// Profile endpoint could not be called with the issued token.
	#[error("Profile request failed.")]
	ProfileFetch(#[from] ProfileFetchError),
	/// Profile endpoint answered with something other than a JSON object.
	#[error("Profile response could not be decoded.")]
	Decode(#[from] DecodeError),
	/// Token could not be encoded for the response.
	#[error("Token could not be serialized.")]
	Serialize(#[from] SerializeError),
}
impl Error {
	/// Renders the error and every source in the chain, separated by `: `.
	pub fn chain_message(&self) -> String {
		let mut message = self.to_string();
		let mut source = self.source();

		while let Some(cause) = source {
			message.truncate(message.trim_end_matches('.').len());
			message.push_str(": ");
			message.push_str(&cause.to_string());

			source = cause.source();
		}

		message
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider descriptor failed validation.
	#[error("Provider descriptor is invalid.")]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Token endpoint URL was rejected by the OAuth client.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Configured scopes cannot be normalized.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Required credential is missing or blank.
	#[error("The {name} is missing.")]
	MissingCredential {
		/// Human-readable credential name.
		name: &'static str,
	},
	/// Listener address could not be resolved.
	#[error("Listen address `{address}` is invalid.")]
	InvalidListenAddress {
		/// Offending `host:port` string.
		address: String,
	},
	/// Listener could not be bound or served.
	#[error("HTTP listener failed.")]
	Listener(#[from] std::io::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while turning an authorization code into a token.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Provider redirected back with an OAuth error instead of a code.
	#[error("Provider denied the authorization request: {}.", describe_oauth_error(.error, .description.as_deref()))]
	AuthorizationDenied {
		/// OAuth `error` query parameter.
		error: String,
		/// OAuth `error_description` query parameter, if present.
		description: Option<String>,
	},
	/// Callback request carried no (or an empty) `code` parameter.
	#[error("Callback request is missing the authorization code.")]
	MissingCode,
	/// Token endpoint answered with an OAuth error response.
	#[error("Token endpoint rejected the exchange: {}.", describe_oauth_error(.error, .description.as_deref()))]
	Rejected {
		/// OAuth `error` field.
		error: String,
		/// OAuth `error_description` field, if present.
		description: Option<String>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with JSON that is not a token response.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded in a way the OAuth client could not interpret.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	UnexpectedResponse {
		/// Summary of what was unexpected.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl ExchangeError {
	/// HTTP status returned by the token endpoint, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::MalformedResponse { status, .. }
			| Self::UnexpectedResponse { status, .. } => *status,
			Self::Transport(err) => err.status(),
			Self::AuthorizationDenied { .. } | Self::MissingCode => None,
		}
	}
}

/// Failures raised while calling the profile endpoint.
#[derive(Debug, ThisError)]
pub enum ProfileFetchError {
	/// Profile endpoint answered with a non-success status.
	#[error("Profile endpoint responded with HTTP {status}: {body_preview}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body_preview: String,
	},
	/// Profile endpoint could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Profile body is not a JSON object.
#[derive(Debug, ThisError)]
#[error("Profile body is not a JSON object (at `{}`).", .source.path())]
pub struct DecodeError {
	/// Structured parsing failure.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}

/// Token could not be encoded as JSON.
#[derive(Debug, ThisError)]
#[error("Token could not be encoded as JSON.")]
pub struct SerializeError(#[from] pub serde_json::Error);

/// Transport-level failures shared by every upstream call.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint being called.
		endpoint: UpstreamEndpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request to the {endpoint} endpoint timed out.")]
	Timeout {
		/// Endpoint being called.
		endpoint: UpstreamEndpoint,
	},
	/// HTTP request could not be assembled.
	#[error("HTTP request for the {endpoint} endpoint could not be built.")]
	Request {
		/// Endpoint being called.
		endpoint: UpstreamEndpoint,
		/// Underlying builder failure.
		#[source]
		source: oauth2::http::Error,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the {endpoint} endpoint.")]
	Io {
		/// Endpoint being called.
		endpoint: UpstreamEndpoint,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Transport failed for a reason it could only describe as text.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Other {
		/// Endpoint being called.
		endpoint: UpstreamEndpoint,
		/// Transport-supplied description.
		message: String,
		/// HTTP status code captured before the failure, if any.
		status: Option<u16>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: UpstreamEndpoint,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// HTTP status captured before the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Other { status, .. } => *status,
			_ => None,
		}
	}
}

fn describe_oauth_error(error: &str, description: Option<&str>) -> String {
	match description {
		Some(description) if !description.is_empty() => format!("{error} ({description})"),
		_ => error.to_owned(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn chain_message_walks_every_source() {
		let err = Error::from(ExchangeError::Rejected {
			error: "invalid_grant".into(),
			description: Some("AADSTS70008: code expired".into()),
			status: Some(400),
		});

		assert_eq!(err.to_string(), "Authorization code exchange failed.");
		assert_eq!(
			err.chain_message(),
			"Authorization code exchange failed: Token endpoint rejected the exchange: invalid_grant (AADSTS70008: code expired)."
		);
		assert!(!err.chain_message().contains(".:"));
		assert_eq!(
			Error::from(ExchangeError::MissingCode).chain_message(),
			"Authorization code exchange failed: Callback request is missing the authorization code."
		);
	}

	#[test]
	fn exchange_status_prefers_recorded_metadata() {
		let transport = ExchangeError::Transport(TransportError::Other {
			endpoint: UpstreamEndpoint::Token,
			message: "throttled".into(),
			status: Some(429),
		});

		assert_eq!(transport.status(), Some(429));
		assert_eq!(ExchangeError::MissingCode.status(), None);
	}

	#[test]
	fn denied_authorization_omits_empty_description() {
		let err = ExchangeError::AuthorizationDenied {
			error: "access_denied".into(),
			description: Some(String::new()),
		};

		assert_eq!(err.to_string(), "Provider denied the authorization request: access_denied.");
	}
}
