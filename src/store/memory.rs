use std::{
	collections::HashMap,
	sync::{Mutex, MutexGuard},
};

use uuid::Uuid;

use super::{Error, PostStore, ProfileStore, UserStore};
use crate::route::{
	auth::model::User,
	post::model::Post,
	profile::model::{Owner, Profile},
};

/// In-process store used by the route tests.
#[derive(Default)]
pub struct Memory {
	users: Mutex<HashMap<Uuid, User>>,
	profiles: Mutex<Vec<Profile>>,
	posts: Mutex<Vec<Post>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().expect("store lock poisoned")
}

impl Memory {
	/// Fills in the owner the same way the Postgres join does.
	fn with_owner(&self, mut profile: Profile) -> Option<Profile> {
		let users = lock(&self.users);
		let user = users.get(&profile.user.id)?;

		profile.user = Owner::from(user);
		Some(profile)
	}
}

#[axum::async_trait]
impl UserStore for Memory {
	async fn insert_user(&self, user: &User) -> Result<(), Error> {
		let mut users = lock(&self.users);

		if users.values().any(|u| u.email == user.email) {
			return Err(Error::Conflict("email"));
		}

		users.insert(user.id, user.clone());
		Ok(())
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		Ok(lock(&self.users).get(&id).cloned())
	}

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
		Ok(lock(&self.users)
			.values()
			.find(|user| user.email == email)
			.cloned())
	}

	async fn delete_user(&self, id: Uuid) -> Result<bool, Error> {
		Ok(lock(&self.users).remove(&id).is_some())
	}
}

#[axum::async_trait]
impl ProfileStore for Memory {
	async fn list_profiles(&self) -> Result<Vec<Profile>, Error> {
		let profiles = lock(&self.profiles).clone();

		Ok(profiles
			.into_iter()
			.filter_map(|profile| self.with_owner(profile))
			.collect())
	}

	async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, Error> {
		let profile = lock(&self.profiles)
			.iter()
			.find(|profile| profile.user.id == user_id)
			.cloned();

		Ok(profile.and_then(|profile| self.with_owner(profile)))
	}

	async fn save_profile(&self, profile: &Profile) -> Result<(), Error> {
		let mut profiles = lock(&self.profiles);

		match profiles.iter_mut().find(|p| p.user.id == profile.user.id) {
			Some(existing) => {
				let date = existing.date;
				*existing = profile.clone();
				existing.date = date;
			}
			None => profiles.push(profile.clone()),
		}

		Ok(())
	}

	async fn delete_profile(&self, user_id: Uuid) -> Result<bool, Error> {
		let mut profiles = lock(&self.profiles);
		let before = profiles.len();

		profiles.retain(|profile| profile.user.id != user_id);
		Ok(profiles.len() != before)
	}
}

#[axum::async_trait]
impl PostStore for Memory {
	async fn list_posts(&self) -> Result<Vec<Post>, Error> {
		// posts created within the same clock tick stay newest first
		let mut posts = lock(&self.posts).iter().rev().cloned().collect::<Vec<_>>();

		posts.sort_by(|a, b| b.date.cmp(&a.date));
		Ok(posts)
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		Ok(lock(&self.posts).iter().find(|post| post.id == id).cloned())
	}

	async fn save_post(&self, post: &Post) -> Result<(), Error> {
		let mut posts = lock(&self.posts);

		match posts.iter_mut().find(|p| p.id == post.id) {
			Some(existing) => {
				existing.text.clone_from(&post.text);
				existing.likes.clone_from(&post.likes);
				existing.comments.clone_from(&post.comments);
			}
			None => posts.push(post.clone()),
		}

		Ok(())
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool, Error> {
		let mut posts = lock(&self.posts);
		let before = posts.len();

		posts.retain(|post| post.id != id);
		Ok(posts.len() != before)
	}
}
