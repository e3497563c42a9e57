use std::sync::Arc;

use aide::{
	axum::IntoApiResponse,
	openapi::{ApiKeyLocation, OpenApi, SecurityScheme, Tag},
	transform::TransformOpenApi,
};
use axum::{response::IntoResponse, Extension};

use crate::{error, extract::Json, token};

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const PROFILE: &str = "Profile";
	pub const POST: &str = "Post";
}

/// Name of the security scheme required by routes that take a [`crate::extract::Session`].
pub const SECURITY_SCHEME_TOKEN: &str = "Token";

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("DevConnector API")
		.summary("Developer profiles, posts and comments")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::AUTH.into(),
			description: Some("Registration and authentication".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::PROFILE.into(),
			description: Some("Developer profiles".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Posts, likes and comments".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_TOKEN,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Header,
				name: token::HEADER_NAME.into(),
				description: Some("A session token returned by registration or login".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::Message<'static>>, _>(|res| {
			res.example(error::Message::new("error message").param("optional field"))
		})
}

/// Serves the generated `OpenAPI` document.
pub async fn serve(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	axum::Json(api.as_ref()).into_response()
}
