use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered user.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The name displayed next to the user's profile, posts and comments.
	pub name: String,
	/// The address used for logging in. Unique across users.
	pub email: String,
	/// Gravatar URL derived from the email at registration.
	pub avatar: String,
	/// Argon2 hash of the password, salted with `id`.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// When the user registered.
	#[sqlx(rename = "created_at")]
	pub date: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	#[serde(default)]
	#[validate(length(min = 1, message = "Name is required"))]
	pub name: String,
	#[serde(default)]
	#[validate(email(message = "Please include a valid email"))]
	pub email: String,
	#[serde(default)]
	#[validate(length(min = 5, message = "Please enter a password with 5 or more characters"))]
	pub password: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[serde(default)]
	#[validate(email(message = "Please include a valid email"))]
	pub email: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "Password is required"))]
	pub password: String,
}

/// A signed session token, sent back in the `x-auth-token` header.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Token {
	pub token: String,
}
