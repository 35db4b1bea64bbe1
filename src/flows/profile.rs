//! Authenticated profile request.

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{Method, Request, header},
};
// self
use crate::{
	_prelude::*,
	auth::{Token, UserProfile},
	error::{ProfileFetchError, TransportError},
	flows::OAuthClient,
	http::{ProviderHttpClient, ResponseMetadataSlot, UpstreamEndpoint},
	oauth::TransportErrorMapper,
};

const BODY_PREVIEW_LIMIT: usize = 256;

impl<C, M> OAuthClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Calls the profile endpoint with `token` as the bearer credential and decodes the body as a
	/// JSON object.
	pub async fn fetch_profile(&self, token: &Token) -> Result<UserProfile> {
		let endpoint = UpstreamEndpoint::Profile;
		let request = Request::builder()
			.method(Method::GET)
			.uri(self.config.profile_url().as_str())
			.header(header::AUTHORIZATION, format!("Bearer {}", token.access_token.expose()))
			.header(header::ACCEPT, "application/json")
			.body(Vec::new())
			.map_err(|source| TransportError::Request { endpoint, source })
			.map_err(ProfileFetchError::from)?;
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = handle.call(request).await.map_err(|err| {
			ProfileFetchError::from(self.transport_mapper.map_transport_error(
				endpoint,
				meta.take().as_ref(),
				err,
			))
		})?;
		let status = response.status();

		if !status.is_success() {
			let body_preview = truncate_preview(String::from_utf8_lossy(response.body()).into_owned());

			tracing::warn!(status = status.as_u16(), "Profile endpoint rejected the request.");

			return Err(ProfileFetchError::Status { status: status.as_u16(), body_preview }.into());
		}

		Ok(UserProfile::from_slice(response.body())?)
	}
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = body.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn previews_are_bounded() {
		assert_eq!(truncate_preview("short".into()), "short");

		let preview = truncate_preview("é".repeat(BODY_PREVIEW_LIMIT + 10));

		assert_eq!(preview.chars().count(), BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}
}
