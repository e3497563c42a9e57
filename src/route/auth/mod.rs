use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during registration and authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Returned for both an unknown email and a wrong password.
	#[error("Invalid credentials")]
	InvalidCredentials,
	#[error("User already exists")]
	EmailTaken,
	#[error("No token, authorization denied")]
	NoToken,
	#[error("Token is not valid")]
	InvalidToken,
	#[error("User not found")]
	UnknownUser,
	#[error("password hashing error: {0}")]
	Argon(#[from] argon2::Error),
	#[error("token signing error: {0}")]
	Token(#[from] jsonwebtoken::errors::Error),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

/// Routes mounted at `/api/users`.
pub fn user_routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/", post_with(register, register_docs))
}

/// Routes mounted at `/api/auth`.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/",
		get_with(get_me, get_me_docs).post_with(login, login_docs),
	)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidCredentials | Self::EmailTaken => StatusCode::BAD_REQUEST,
			Self::NoToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
			Self::UnknownUser => StatusCode::NOT_FOUND,
			Self::Argon(..) | Self::Token(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn is_form_error(&self) -> bool {
		matches!(self, Self::InvalidCredentials | Self::EmailTaken)
	}
}
