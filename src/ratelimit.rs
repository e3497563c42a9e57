use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use governor::{
	clock::QuantaInstant,
	middleware::{RateLimitingMiddleware, StateInformationMiddleware},
};
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::{KeyExtractor, PeerIpKeyExtractor},
	GovernorError,
};

use crate::error::{Message, SERVER_ERROR};

pub type Config = Arc<GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>>;

/// Limit applied to the whole API.
pub fn default() -> Config {
	build(10, 50)
}

/// Limit applied to registration and login.
pub fn secure() -> Config {
	build(1, 5)
}

fn build(per_second: u64, burst_size: u32) -> Config {
	Arc::new(
		GovernorConfigBuilder::default()
			.per_second(per_second)
			.burst_size(burst_size)
			.use_headers()
			.error_handler(error_handler)
			.finish()
			// only `None` for a zero period or burst size
			.expect("invalid rate limit"),
	)
}

fn error_handler(error: GovernorError) -> Response<Body> {
	match error {
		GovernorError::TooManyRequests { headers, .. } => {
			let mut response = (
				StatusCode::TOO_MANY_REQUESTS,
				Json(Message::new("Too many requests")),
			)
				.into_response();

			if let Some(headers) = headers {
				response.headers_mut().extend(headers);
			}

			response
		}
		GovernorError::UnableToExtractKey => {
			tracing::error!("unable to extract the peer address for rate limiting");

			(
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(Message::new(SERVER_ERROR)),
			)
				.into_response()
		}
		GovernorError::Other { code, msg, headers } => {
			let mut response = (
				code,
				Json(Message::new(msg.unwrap_or_else(|| SERVER_ERROR.into()))),
			)
				.into_response();

			if let Some(headers) = headers {
				response.headers_mut().extend(headers);
			}

			response
		}
	}
}

pub fn cleanup_old_limits<T, M>(configs: &[&Arc<GovernorConfig<T, M>>])
where
	T: KeyExtractor,
	<T as KeyExtractor>::Key: Send + Sync + 'static,
	M: RateLimitingMiddleware<QuantaInstant> + Send + Sync + 'static,
{
	let limiters = configs
		.iter()
		.map(|config| config.limiter().clone())
		.collect::<Vec<_>>();
	let interval = Duration::from_secs(60);

	std::thread::spawn(move || loop {
		std::thread::sleep(interval);

		for limiter in &limiters {
			tracing::debug!("rate limiting storage size: {}", limiter.len());

			limiter.retain_recent();
		}
	});
}
