use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The request header that carries the session token.
pub const HEADER_NAME: &str = "x-auth-token";

/// The token payload: `{ "user": { "id": ... } }` plus timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
	user: Subject,
	iat: i64,
	exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Subject {
	id: Uuid,
}

/// Returned for any token that cannot be trusted. Bad signatures, malformed
/// payloads and expired tokens all map to this one error.
#[derive(Debug, thiserror::Error)]
#[error("token is not valid")]
pub struct InvalidToken;

struct Keys {
	encoding: EncodingKey,
	decoding: DecodingKey,
	validation: Validation,
	ttl: Duration,
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenService(Arc<Keys>);

impl TokenService {
	pub fn new(secret: &[u8], ttl: Duration) -> Self {
		let mut validation = Validation::new(Algorithm::HS256);
		validation.leeway = 0;

		Self(Arc::new(Keys {
			encoding: EncodingKey::from_secret(secret),
			decoding: DecodingKey::from_secret(secret),
			validation,
			ttl,
		}))
	}

	/// Signs a token identifying `user_id` that expires after the configured lifetime.
	pub fn issue(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
		let now = Utc::now();
		let claims = Claims {
			user: Subject { id: user_id },
			iat: now.timestamp(),
			exp: (now + self.0.ttl).timestamp(),
		};

		jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.0.encoding)
	}

	/// Resolves the user a token was issued for.
	pub fn verify(&self, token: &str) -> Result<Uuid, InvalidToken> {
		jsonwebtoken::decode::<Claims>(token, &self.0.decoding, &self.0.validation)
			.map(|data| data.claims.user.id)
			.map_err(|error| {
				tracing::debug!(%error, "rejected token");
				InvalidToken
			})
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn service() -> TokenService {
		TokenService::new(b"test-secret", Duration::hours(1))
	}

	#[test]
	fn test_issue_then_verify() {
		let tokens = service();
		let user_id = Uuid::new_v4();

		let token = tokens.issue(user_id).unwrap();

		assert_eq!(tokens.verify(&token).unwrap(), user_id);
	}

	#[test]
	fn test_altered_signature() {
		let tokens = service();
		let token = tokens.issue(Uuid::new_v4()).unwrap();

		let (unsigned, signature) = token.rsplit_once('.').unwrap();
		let first = if signature.starts_with('A') { 'B' } else { 'A' };
		let forged = format!("{unsigned}.{first}{}", &signature[1..]);

		assert!(tokens.verify(&forged).is_err());
	}

	#[test]
	fn test_other_secret() {
		let token = TokenService::new(b"another-secret", Duration::hours(1))
			.issue(Uuid::new_v4())
			.unwrap();

		assert!(service().verify(&token).is_err());
	}

	#[test]
	fn test_expired() {
		let token = TokenService::new(b"test-secret", Duration::hours(-2))
			.issue(Uuid::new_v4())
			.unwrap();

		assert!(service().verify(&token).is_err());
	}

	#[test]
	fn test_malformed() {
		assert!(service().verify("").is_err());
		assert!(service().verify("not.a.token").is_err());
	}
}
