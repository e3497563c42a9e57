#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod github;
mod gravatar;
mod openapi;
mod ratelimit;
mod route;
mod store;
mod token;
mod trace;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use aide::{
	axum::{routing::get, ApiRouter},
	openapi::OpenApi,
};
use argon2::Argon2;
use axum::{http::Response, Extension};
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing::Span;

pub use config::Config;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the store, a hash configuration (if it's expensive to create),
/// or an HTTP client.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Arc<dyn store::Store>,
	pub hasher: Argon2<'static>,
	pub tokens: token::TokenService,
	pub github: github::Client,
}

/// Builds the router for the whole API.
///
/// `secure` rate-limits registration and login. It requires the peer address,
/// so it is left out when the router is not served with connect info.
pub fn app(state: State, secure: Option<ratelimit::Config>) -> axum::Router {
	let mut api = OpenApi::default();

	let mut users = route::auth::user_routes();
	let mut auth = route::auth::routes();

	if let Some(config) = secure {
		users = users.layer(GovernorLayer {
			config: config.clone(),
		});
		auth = auth.layer(GovernorLayer { config });
	}

	let router = ApiRouter::new()
		.nest("/api/users", users)
		.nest("/api/auth", auth)
		.nest("/api/profile", route::profile::routes())
		.nest("/api/posts", route::post::routes())
		.route("/docs/api.json", get(openapi::serve))
		.finish_api_with(&mut api, openapi::docs);

	router
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http().on_response(
					|response: &Response<_>, latency: Duration, _span: &Span| {
						tracing::info!(
							histogram.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
							status = response.status().as_u16(),
							"response"
						);
					},
				))
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = Config::from_env().expect("invalid configuration");
	let _guard = trace::init_tracing_subscriber(&config);

	let database = Database::connect(&config.database_url)
		.await
		.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let state = State {
		store: Arc::new(store::Postgres::new(database)),
		hasher: Argon2::default(),
		tokens: token::TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl),
		github: github::Client::new(&config.github).expect("failed to build the Github client"),
	};

	let default_limit = ratelimit::default();
	let secure_limit = ratelimit::secure();

	ratelimit::cleanup_old_limits(&[&default_limit, &secure_limit]);

	let app = app(state, Some(secure_limit)).layer(GovernorLayer {
		config: default_limit,
	});

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!(host = %config.host, port = config.port, "listening");

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await
	.expect("server error");
}
