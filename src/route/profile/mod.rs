use aide::axum::{
	routing::{delete_with, get_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("There is no profile for this user")]
	UnknownProfile,
	/// An experience or education entry that is not on the profile.
	#[error("Entry not found")]
	UnknownEntry,
	#[error("User not found")]
	UnknownUser,
	#[error("No Github profile found")]
	UnknownGithubUser,
	#[error("github request failed: {0}")]
	Github(#[from] reqwest::Error),
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
			get_with(get_profiles, get_profiles_docs)
				.post_with(upsert_profile, upsert_profile_docs)
				.delete_with(delete_account, delete_account_docs),
		)
		.api_route("/me", get_with(get_own_profile, get_own_profile_docs))
		.api_route("/user/:id", get_with(get_profile, get_profile_docs))
		.api_route("/experience", put_with(add_experience, add_experience_docs))
		.api_route(
			"/experience/:id",
			delete_with(remove_experience, remove_experience_docs),
		)
		.api_route("/education", put_with(add_education, add_education_docs))
		.api_route(
			"/education/:id",
			delete_with(remove_education, remove_education_docs),
		)
		.api_route(
			"/github/:username",
			get_with(get_github_repos, get_github_repos_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownProfile
			| Self::UnknownEntry
			| Self::UnknownUser
			| Self::UnknownGithubUser => StatusCode::NOT_FOUND,
			Self::Github(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
