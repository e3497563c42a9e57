use axum::extract::State;
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	route::model::{IdInput, Notice},
	AppState,
};

use super::{model, Error, RouteError};

/// Loads a post, treating a malformed id like an unknown one.
async fn find_post(state: &AppState, id: &str) -> Result<model::Post, RouteError> {
	let Ok(id) = Uuid::parse_str(id) else {
		return Err(Error::UnknownPost.into());
	};

	let post = state.store.find_post(id).await?;

	Ok(post.ok_or(Error::UnknownPost)?)
}

/// Get all posts
/// Returns every post, newest first.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(state): State<AppState>,
	_session: Session,
) -> Result<Json<Vec<model::Post>>, RouteError> {
	Ok(Json(state.store.list_posts().await?))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(state): State<AppState>,
	_session: Session,
	Path(path): Path<IdInput>,
) -> Result<Json<model::Post>, RouteError> {
	Ok(Json(find_post(&state, &path.id).await?))
}

/// Create post
/// Creates a new post, signed with the current name and avatar of the session user.
#[route(tag = tag::POST)]
pub async fn create_post(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<model::TextInput>,
) -> Result<Json<model::Post>, RouteError> {
	let user = state
		.store
		.find_user(session.user_id)
		.await?
		.ok_or(Error::UnknownUser)?;

	let post = model::Post::new(&user, input.text);

	state.store.save_post(&post).await?;

	Ok(Json(post))
}

/// Delete post
/// Deletes a post written by the session user.
#[route(tag = tag::POST)]
pub async fn delete_post(
	State(state): State<AppState>,
	session: Session,
	Path(path): Path<IdInput>,
) -> Result<Json<Notice>, RouteError> {
	let post = find_post(&state, &path.id).await?;

	post.ensure_author(session.user_id)?;

	if !state.store.delete_post(post.id).await? {
		return Err(Error::UnknownPost.into());
	}

	Ok(Json(Notice::new("Post removed")))
}

/// Like post
/// Likes a post, returning its likes.
#[route(tag = tag::POST)]
pub async fn like_post(
	State(state): State<AppState>,
	session: Session,
	Path(path): Path<IdInput>,
) -> Result<Json<Vec<model::Like>>, RouteError> {
	let mut post = find_post(&state, &path.id).await?;

	post.like(session.user_id)?;
	state.store.save_post(&post).await?;

	Ok(Json(post.likes))
}

/// Unlike post
/// Removes the session user's like from a post, returning its likes.
#[route(tag = tag::POST)]
pub async fn unlike_post(
	State(state): State<AppState>,
	session: Session,
	Path(path): Path<IdInput>,
) -> Result<Json<Vec<model::Like>>, RouteError> {
	let mut post = find_post(&state, &path.id).await?;

	post.unlike(session.user_id)?;
	state.store.save_post(&post).await?;

	Ok(Json(post.likes))
}

/// Comment on post
/// Adds a comment to the front of a post, returning its comments.
#[route(tag = tag::POST)]
pub async fn add_comment(
	State(state): State<AppState>,
	session: Session,
	Path(path): Path<IdInput>,
	Json(input): Json<model::TextInput>,
) -> Result<Json<Vec<model::Comment>>, RouteError> {
	let user = state
		.store
		.find_user(session.user_id)
		.await?
		.ok_or(Error::UnknownUser)?;

	let mut post = find_post(&state, &path.id).await?;

	post.add_comment(&user, input.text);
	state.store.save_post(&post).await?;

	Ok(Json(post.comments))
}

/// Delete comment
/// Deletes a comment written by the session user, returning the remaining comments.
#[route(tag = tag::POST)]
pub async fn remove_comment(
	State(state): State<AppState>,
	session: Session,
	Path(path): Path<model::CommentPath>,
) -> Result<Json<Vec<model::Comment>>, RouteError> {
	let mut post = find_post(&state, &path.id).await?;
	let comment_id = Uuid::parse_str(&path.comment_id).map_err(|_| Error::CommentNotFound)?;

	post.remove_comment(session.user_id, comment_id)?;
	state.store.save_post(&post).await?;

	Ok(Json(post.comments))
}
