use aide::axum::{
	routing::{delete_with, get_with, post_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Post not found")]
	UnknownPost,
	#[error("Comment does not exist")]
	CommentNotFound,
	/// The session user does not own the post or comment.
	#[error("User not authorized")]
	NotAuthorized,
	#[error("Post already liked")]
	AlreadyLiked,
	#[error("Post has not yet been liked")]
	NotLiked,
	#[error("User not found")]
	UnknownUser,
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs).delete_with(delete_post, delete_post_docs),
		)
		.api_route("/like/:id", put_with(like_post, like_post_docs))
		.api_route("/unlike/:id", put_with(unlike_post, unlike_post_docs))
		.api_route("/comment/:id", post_with(add_comment, add_comment_docs))
		.api_route(
			"/comment/:id/:comment_id",
			delete_with(remove_comment, remove_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost | Self::CommentNotFound | Self::UnknownUser => StatusCode::NOT_FOUND,
			Self::NotAuthorized => StatusCode::UNAUTHORIZED,
			Self::AlreadyLiked | Self::NotLiked => StatusCode::BAD_REQUEST,
		}
	}
}
