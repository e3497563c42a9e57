use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Error;
use crate::route::{auth::model::User, model::remove_entry};

/// A like left on a post. Each user likes a post at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Like {
	pub user: Uuid,
}

/// A comment on a post, with the author's name and avatar as they were
/// when the comment was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
	pub id: Uuid,
	pub user: Uuid,
	pub name: String,
	pub avatar: String,
	pub text: String,
	pub date: DateTime<Utc>,
}

/// A single post, created by a user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Post {
	/// The unique identifier of the post.
	pub id: Uuid,
	/// The author of the post.
	pub user: Uuid,
	/// The author's name when the post was created.
	pub name: String,
	/// The author's avatar when the post was created.
	pub avatar: String,
	pub text: String,
	/// Newest first.
	pub likes: Vec<Like>,
	/// Newest first.
	pub comments: Vec<Comment>,
	/// The creation time of the post.
	pub date: DateTime<Utc>,
}

impl Post {
	pub fn new(author: &User, text: String) -> Self {
		Self {
			id: Uuid::new_v4(),
			user: author.id,
			name: author.name.clone(),
			avatar: author.avatar.clone(),
			text,
			likes: Vec::new(),
			comments: Vec::new(),
			date: Utc::now(),
		}
	}

	pub fn ensure_author(&self, user_id: Uuid) -> Result<(), Error> {
		if self.user == user_id {
			Ok(())
		} else {
			Err(Error::NotAuthorized)
		}
	}

	pub fn is_liked_by(&self, user_id: Uuid) -> bool {
		self.likes.iter().any(|like| like.user == user_id)
	}

	pub fn like(&mut self, user_id: Uuid) -> Result<(), Error> {
		if self.is_liked_by(user_id) {
			return Err(Error::AlreadyLiked);
		}

		self.likes.insert(0, Like { user: user_id });
		Ok(())
	}

	pub fn unlike(&mut self, user_id: Uuid) -> Result<(), Error> {
		remove_entry(&mut self.likes, |like| like.user == user_id)
			.map(drop)
			.ok_or(Error::NotLiked)
	}

	pub fn add_comment(&mut self, author: &User, text: String) -> &Comment {
		self.comments.insert(
			0,
			Comment {
				id: Uuid::new_v4(),
				user: author.id,
				name: author.name.clone(),
				avatar: author.avatar.clone(),
				text,
				date: Utc::now(),
			},
		);

		&self.comments[0]
	}

	/// Removes the comment with `comment_id`, which must have been written by `user_id`.
	pub fn remove_comment(&mut self, user_id: Uuid, comment_id: Uuid) -> Result<Comment, Error> {
		let comment = self
			.comments
			.iter()
			.find(|comment| comment.id == comment_id)
			.ok_or(Error::CommentNotFound)?;

		if comment.user != user_id {
			return Err(Error::NotAuthorized);
		}

		remove_entry(&mut self.comments, |comment| comment.id == comment_id)
			.ok_or(Error::CommentNotFound)
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct TextInput {
	#[serde(default)]
	#[validate(length(min = 1, message = "Text is required"))]
	pub text: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CommentPath {
	/// The post id.
	pub id: String,
	pub comment_id: String,
}

#[cfg(test)]
mod test {
	use super::*;

	fn user(name: &str) -> User {
		User {
			id: Uuid::new_v4(),
			name: name.into(),
			email: format!("{}@x.com", name.to_lowercase()),
			avatar: format!("https://www.gravatar.com/avatar/{name}"),
			password: Vec::new(),
			date: Utc::now(),
		}
	}

	#[test]
	fn test_new_post_snapshots_author() {
		let mut author = user("Ana");
		let post = Post::new(&author, "hello".into());

		author.name = "Anabel".into();

		assert_eq!(post.name, "Ana");
		assert_eq!(post.user, author.id);
		assert!(post.likes.is_empty() && post.comments.is_empty());
	}

	#[test]
	fn test_like_twice() {
		let author = user("Ana");
		let mut post = Post::new(&author, "hello".into());

		post.like(author.id).unwrap();

		assert!(matches!(post.like(author.id), Err(Error::AlreadyLiked)));
		assert_eq!(post.likes.len(), 1);
	}

	#[test]
	fn test_likes_are_newest_first() {
		let (ana, bo) = (user("Ana"), user("Bo"));
		let mut post = Post::new(&ana, "hello".into());

		post.like(ana.id).unwrap();
		post.like(bo.id).unwrap();

		assert_eq!(post.likes, [Like { user: bo.id }, Like { user: ana.id }]);
	}

	#[test]
	fn test_unlike() {
		let (ana, bo) = (user("Ana"), user("Bo"));
		let mut post = Post::new(&ana, "hello".into());

		assert!(matches!(post.unlike(ana.id), Err(Error::NotLiked)));

		post.like(ana.id).unwrap();
		post.like(bo.id).unwrap();
		post.unlike(ana.id).unwrap();

		assert_eq!(post.likes, [Like { user: bo.id }]);

		post.unlike(bo.id).unwrap();

		assert!(post.likes.is_empty());
	}

	#[test]
	fn test_only_author_may_delete() {
		let (ana, bo) = (user("Ana"), user("Bo"));
		let post = Post::new(&ana, "hello".into());

		assert!(post.ensure_author(ana.id).is_ok());
		assert!(matches!(
			post.ensure_author(bo.id),
			Err(Error::NotAuthorized)
		));
	}

	#[test]
	fn test_remove_comment_by_id() {
		let ana = user("Ana");
		let mut post = Post::new(&ana, "hello".into());

		let first = post.add_comment(&ana, "first".into()).id;
		let second = post.add_comment(&ana, "second".into()).id;

		let removed = post.remove_comment(ana.id, second).unwrap();

		assert_eq!(removed.text, "second");
		assert_eq!(post.comments.len(), 1);
		assert_eq!(post.comments[0].id, first);
	}

	#[test]
	fn test_remove_comment_checks() {
		let (ana, bo) = (user("Ana"), user("Bo"));
		let mut post = Post::new(&ana, "hello".into());
		let id = post.add_comment(&ana, "mine".into()).id;

		assert!(matches!(
			post.remove_comment(ana.id, Uuid::new_v4()),
			Err(Error::CommentNotFound)
		));
		assert!(matches!(
			post.remove_comment(bo.id, id),
			Err(Error::NotAuthorized)
		));
		assert_eq!(post.comments.len(), 1);
	}
}
