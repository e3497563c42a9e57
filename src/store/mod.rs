//! Persistence ports.
//!
//! Every aggregate (user, profile, post) is read and written as one document,
//! sub-lists included. Saves replace the stored document, so two concurrent
//! read-modify-write cycles on the same document resolve as last writer wins.

#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::Postgres;

use uuid::Uuid;

use crate::route::{auth::model::User, post::model::Post, profile::model::Profile};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("duplicate value for unique key {0}")]
	Conflict(&'static str),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

#[axum::async_trait]
pub trait UserStore: Send + Sync {
	/// Fails with [`Error::Conflict`] if the email is already registered.
	async fn insert_user(&self, user: &User) -> Result<(), Error>;

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error>;

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;

	/// Returns whether a user was deleted.
	async fn delete_user(&self, id: Uuid) -> Result<bool, Error>;
}

#[axum::async_trait]
pub trait ProfileStore: Send + Sync {
	/// All profiles, oldest first, with their owner filled in.
	async fn list_profiles(&self) -> Result<Vec<Profile>, Error>;

	async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, Error>;

	/// Inserts the profile or replaces the one owned by the same user.
	/// The owner's name and avatar are not stored with the profile.
	async fn save_profile(&self, profile: &Profile) -> Result<(), Error>;

	async fn delete_profile(&self, user_id: Uuid) -> Result<bool, Error>;
}

#[axum::async_trait]
pub trait PostStore: Send + Sync {
	/// All posts, newest first.
	async fn list_posts(&self) -> Result<Vec<Post>, Error>;

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error>;

	/// Inserts the post or replaces the one with the same id.
	async fn save_post(&self, post: &Post) -> Result<(), Error>;

	async fn delete_post(&self, id: Uuid) -> Result<bool, Error>;
}

/// Everything the routes need from persistence.
pub trait Store: UserStore + ProfileStore + PostStore {}

impl<T> Store for T where T: UserStore + ProfileStore + PostStore {}
