use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::request,
};
use uuid::Uuid;

use crate::{
	error::RouteError,
	openapi::SECURITY_SCHEME_TOKEN,
	route::auth,
	token::{self, TokenService},
};

/// The identity behind an authenticated request.
///
/// Extracting a [`Session`] guards a route: a missing token is rejected with
/// [`auth::Error::NoToken`] and an untrusted one with [`auth::Error::InvalidToken`],
/// before the handler runs.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{}", session.user_id);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Session {
	pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	TokenService: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let token = parts
			.headers
			.get(token::HEADER_NAME)
			.ok_or(auth::Error::NoToken)?
			.to_str()
			.map_err(|_| auth::Error::InvalidToken)?;

		let user_id = TokenService::from_ref(state)
			.verify(token)
			.map_err(|_| auth::Error::InvalidToken)?;

		Ok(Self { user_id })
	}
}

impl OperationInput for Session {
	/// Adds the token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_TOKEN.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}
