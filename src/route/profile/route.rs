use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	route::model::{IdInput, Notice},
	AppState,
};

use super::{model, Error, RouteError};

/// Loads the profile of the session user.
async fn own_profile(state: &AppState, session: Session) -> Result<model::Profile, RouteError> {
	let profile = state.store.find_profile(session.user_id).await?;

	Ok(profile.ok_or(Error::UnknownProfile)?)
}

/// Get all profiles
/// Returns every profile along with the name and avatar of its owner.
#[route(tag = tag::PROFILE)]
pub async fn get_profiles(
	State(state): State<AppState>,
) -> Result<Json<Vec<model::Profile>>, RouteError> {
	Ok(Json(state.store.list_profiles().await?))
}

/// Get own profile
#[route(tag = tag::PROFILE)]
pub async fn get_own_profile(
	State(state): State<AppState>,
	session: Session,
) -> Result<Json<model::Profile>, RouteError> {
	Ok(Json(own_profile(&state, session).await?))
}

/// Get profile by user
/// Returns the profile of the user with the given id.
#[route(tag = tag::PROFILE)]
pub async fn get_profile(
	State(state): State<AppState>,
	Path(path): Path<IdInput>,
) -> Result<Json<model::Profile>, RouteError> {
	let Some(user_id) = path.uuid() else {
		return Err(Error::UnknownProfile.into());
	};

	let profile = state.store.find_profile(user_id).await?;

	Ok(Json(profile.ok_or(Error::UnknownProfile)?))
}

/// Create or update profile
/// Creates the profile of the session user, or updates the submitted fields of an existing one.
#[route(tag = tag::PROFILE)]
pub async fn upsert_profile(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<model::ProfileInput>,
) -> Result<Json<model::Profile>, RouteError> {
	let fields = model::ProfileFields::from(input);

	let profile = match state.store.find_profile(session.user_id).await? {
		Some(mut profile) => {
			profile.apply(fields);
			profile
		}
		None => {
			let user = state
				.store
				.find_user(session.user_id)
				.await?
				.ok_or(Error::UnknownUser)?;

			model::Profile::new(model::Owner::from(&user), fields)
		}
	};

	state.store.save_profile(&profile).await?;

	Ok(Json(profile))
}

/// Delete account
/// Deletes the profile and the user. Posts written by the user are kept.
#[route(tag = tag::PROFILE)]
pub async fn delete_account(
	State(state): State<AppState>,
	session: Session,
) -> Result<Json<Notice>, RouteError> {
	state.store.delete_profile(session.user_id).await?;

	if !state.store.delete_user(session.user_id).await? {
		return Err(Error::UnknownUser.into());
	}

	tracing::info!(user = %session.user_id, "deleted account");

	Ok(Json(Notice::new("User deleted")))
}

/// Add experience
/// Adds an experience entry to the front of the session user's profile.
#[route(tag = tag::PROFILE)]
pub async fn add_experience(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<model::ExperienceInput>,
) -> Result<Json<model::Profile>, RouteError> {
	let entry = model::Experience::try_from(input)?;
	let mut profile = own_profile(&state, session).await?;

	profile.add_experience(entry);
	state.store.save_profile(&profile).await?;

	Ok(Json(profile))
}

/// Delete experience
/// Removes an experience entry from the session user's profile.
#[route(tag = tag::PROFILE)]
pub async fn remove_experience(
	State(state): State<AppState>,
	session: Session,
	Path(path): Path<IdInput>,
) -> Result<Json<model::Profile>, RouteError> {
	let mut profile = own_profile(&state, session).await?;

	path.uuid()
		.and_then(|id| profile.remove_experience(id))
		.ok_or(Error::UnknownEntry)?;

	state.store.save_profile(&profile).await?;

	Ok(Json(profile))
}

/// Add education
/// Adds an education entry to the front of the session user's profile.
#[route(tag = tag::PROFILE)]
pub async fn add_education(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<model::EducationInput>,
) -> Result<Json<model::Profile>, RouteError> {
	let entry = model::Education::try_from(input)?;
	let mut profile = own_profile(&state, session).await?;

	profile.add_education(entry);
	state.store.save_profile(&profile).await?;

	Ok(Json(profile))
}

/// Delete education
/// Removes an education entry from the session user's profile.
#[route(tag = tag::PROFILE)]
pub async fn remove_education(
	State(state): State<AppState>,
	session: Session,
	Path(path): Path<IdInput>,
) -> Result<Json<model::Profile>, RouteError> {
	let mut profile = own_profile(&state, session).await?;

	path.uuid()
		.and_then(|id| profile.remove_education(id))
		.ok_or(Error::UnknownEntry)?;

	state.store.save_profile(&profile).await?;

	Ok(Json(profile))
}

/// Get Github repositories
/// Returns the five oldest public repositories of a Github user, as Github reports them.
#[route(tag = tag::PROFILE)]
pub async fn get_github_repos(
	State(state): State<AppState>,
	Path(input): Path<model::GithubInput>,
) -> Result<Json<serde_json::Value>, RouteError> {
	let repos = state
		.github
		.repositories(&input.username)
		.await
		.map_err(Error::Github)?;

	Ok(Json(repos.ok_or(Error::UnknownGithubUser)?))
}
