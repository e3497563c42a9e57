use std::{borrow::Cow, convert::Infallible};

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection::{JsonRejection, PathRejection},
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::store;

/// The message shown to clients for anything that went wrong on our side.
pub const SERVER_ERROR: &str = "Server error";

/// Describes how a route-specific error is presented to the client.
///
/// The `Display` output of the error is sent as the message, so it must not
/// contain sensitive information.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	/// Form errors share the `{ "errors": [...] }` body with field validation errors.
	fn is_form_error(&self) -> bool {
		false
	}
}

/// A single client-facing message.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	pub msg: Cow<'a, str>,
	/// The input field the message refers to, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub param: Option<Cow<'a, str>>,
}

impl<'a> Message<'a> {
	pub fn new(msg: impl Into<Cow<'a, str>>) -> Self {
		Self {
			msg: msg.into(),
			param: None,
		}
	}

	#[must_use]
	pub fn param(mut self, param: impl Into<Cow<'a, str>>) -> Self {
		self.param = Some(param.into());
		self
	}
}

/// A list of messages, used for validation failures.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Errors<'a> {
	pub errors: Vec<Message<'a>>,
}

/// Error type returned by route handlers.
///
/// `T` is the error type of the route module, and everything else is shared.
/// The `Display` output of the shared variants is only logged.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T> {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("store error: {0}")]
	Store(#[from] store::Error),
	#[error(transparent)]
	Route(T),
}

/// Rejection of the validating extractors, which never carry a route error.
pub type ExtractError = RouteError<Infallible>;

impl ErrorShape for Infallible {
	fn status(&self) -> StatusCode {
		match *self {}
	}
}

fn server_error() -> Response<Body> {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(Message::new(SERVER_ERROR)),
	)
		.into_response()
}

/// Bodies that arrive but cannot be read are reported like failed validation.
fn json_status(rejection: &JsonRejection) -> StatusCode {
	match rejection {
		JsonRejection::JsonDataError(..) | JsonRejection::JsonSyntaxError(..) => {
			StatusCode::BAD_REQUEST
		}
		rejection => rejection.status(),
	}
}

/// Flattens validation errors into messages, ordered by field name.
fn validation_messages(errors: &validator::ValidationErrors) -> Vec<Message<'static>> {
	let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
	fields.sort_by(|(a, _), (b, _)| a.cmp(b));

	fields
		.into_iter()
		.flat_map(|(field, errors)| {
			let field = field.to_string();

			errors.iter().map(move |error| {
				let msg = error
					.message
					.as_ref()
					.map_or_else(|| format!("{field} is invalid"), ToString::to_string);

				Message::new(msg).param(field.clone())
			})
		})
		.collect()
}

impl<T> IntoResponse for RouteError<T>
where
	T: ErrorShape,
{
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Validation(errors) => (
				StatusCode::BAD_REQUEST,
				Json(Errors {
					errors: validation_messages(&errors),
				}),
			)
				.into_response(),
			Self::Json(rejection) => (
				json_status(&rejection),
				Json(Errors {
					errors: vec![Message::new(rejection.body_text())],
				}),
			)
				.into_response(),
			Self::Path(rejection) => {
				(rejection.status(), Json(Message::new(rejection.body_text()))).into_response()
			}
			Self::Store(error) => {
				tracing::error!(%error, "store failure");
				server_error()
			}
			Self::Route(error) => {
				let status = error.status();

				if status.is_server_error() {
					tracing::error!(%error, "route failure");
					return server_error();
				}

				let message = Message::new(error.to_string());

				if error.is_form_error() {
					(
						status,
						Json(Errors {
							errors: vec![message],
						}),
					)
						.into_response()
				} else {
					(status, Json(message)).into_response()
				}
			}
		}
	}
}

impl<T> OperationOutput for RouteError<T> {
	type Inner = Message<'static>;
}

#[cfg(test)]
mod test {
	use validator::Validate;

	use super::*;

	#[derive(Debug, thiserror::Error)]
	enum Sample {
		#[error("Not here")]
		Missing,
		#[error("Bad password")]
		Credentials,
		#[error("disk on fire")]
		Broken,
	}

	impl ErrorShape for Sample {
		fn status(&self) -> StatusCode {
			match self {
				Self::Missing => StatusCode::NOT_FOUND,
				Self::Credentials => StatusCode::BAD_REQUEST,
				Self::Broken => StatusCode::INTERNAL_SERVER_ERROR,
			}
		}

		fn is_form_error(&self) -> bool {
			matches!(self, Self::Credentials)
		}
	}

	#[derive(Validate)]
	struct Input {
		#[validate(length(min = 1, message = "Name is required"))]
		name: String,
		#[validate(email)]
		email: String,
	}

	async fn body(error: RouteError<Sample>) -> (StatusCode, serde_json::Value) {
		let response = error.into_response();
		let status = response.status();
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();

		(status, serde_json::from_slice(&bytes).unwrap())
	}

	#[tokio::test]
	async fn test_domain_error_is_a_message() {
		let (status, body) = body(RouteError::Route(Sample::Missing)).await;

		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body, serde_json::json!({ "msg": "Not here" }));
	}

	#[tokio::test]
	async fn test_form_error_is_a_list() {
		let (status, body) = body(RouteError::Route(Sample::Credentials)).await;

		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body, serde_json::json!({ "errors": [{ "msg": "Bad password" }] }));
	}

	#[tokio::test]
	async fn test_server_error_hides_detail() {
		let (status, body) = body(RouteError::Route(Sample::Broken)).await;

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body, serde_json::json!({ "msg": SERVER_ERROR }));
	}

	#[tokio::test]
	async fn test_validation_errors_are_listed_per_field() {
		let errors = Input {
			name: String::new(),
			email: "nope".into(),
		}
		.validate()
		.unwrap_err();

		let (status, body) = body(RouteError::Validation(errors)).await;

		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(
			body,
			serde_json::json!({
				"errors": [
					{ "msg": "email is invalid", "param": "email" },
					{ "msg": "Name is required", "param": "name" },
				]
			})
		);
	}
}
