use argon2::Argon2;
use axum::extract::State;
use chrono::Utc;
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Session},
	gravatar,
	openapi::tag,
	store,
	AppState,
};

use super::{model, Error, RouteError};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Checks `password` against `user`, hashing it even when there is no user so
/// that unknown emails take as long as wrong passwords.
fn verify_password(
	hasher: &Argon2,
	user: Option<&model::User>,
	password: &str,
) -> Result<bool, argon2::Error> {
	let salt = user.map_or(Uuid::nil(), |user| user.id);
	let hashed = hash_password(hasher, password, &salt)?;

	Ok(user.is_some_and(|user| user.password == hashed))
}

/// Register user
/// Registers a new account, returning a session token.
#[route(tag = tag::AUTH, response(status = 200, description = "Registered successfully.", shape = "Json<model::Token>"))]
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<model::RegisterInput>,
) -> Result<Json<model::Token>, RouteError> {
	if state.store.find_user_by_email(&input.email).await?.is_some() {
		return Err(Error::EmailTaken.into());
	}

	let id = Uuid::new_v4();
	let password = hash_password(&state.hasher, &input.password, &id).map_err(Error::Argon)?;

	let user = model::User {
		id,
		avatar: gravatar::url(&input.email),
		name: input.name,
		email: input.email,
		password: password.to_vec(),
		date: Utc::now(),
	};

	state.store.insert_user(&user).await.map_err(|e| match e {
		store::Error::Conflict(..) => RouteError::from(Error::EmailTaken),
		e => RouteError::from(e),
	})?;

	tracing::info!(user = %user.id, "registered user");

	let token = state.tokens.issue(user.id).map_err(Error::Token)?;

	Ok(Json(model::Token { token }))
}

/// Log in
/// Authenticates with an email and password, returning a session token.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged in successfully.", shape = "Json<model::Token>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(input): Json<model::LoginInput>,
) -> Result<Json<model::Token>, RouteError> {
	let user = state.store.find_user_by_email(&input.email).await?;

	let verified = verify_password(&state.hasher, user.as_ref(), &input.password)
		.map_err(Error::Argon)?;

	let Some(user) = user.filter(|_| verified) else {
		return Err(Error::InvalidCredentials.into());
	};

	let token = state.tokens.issue(user.id).map_err(Error::Token)?;

	Ok(Json(model::Token { token }))
}

/// Get user
/// Returns the authenticated user.
#[route(tag = tag::AUTH)]
pub async fn get_me(
	State(state): State<AppState>,
	session: Session,
) -> Result<Json<model::User>, RouteError> {
	let user = state.store.find_user(session.user_id).await?;

	Ok(Json(user.ok_or(Error::UnknownUser)?))
}
