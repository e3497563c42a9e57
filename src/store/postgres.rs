use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use super::{Error, PostStore, ProfileStore, UserStore};
use crate::{
	route::{
		auth::model::User,
		post::model::{Comment, Like, Post},
		profile::model::{Education, Experience, Owner, Profile, Social},
	},
	Database,
};

/// Store backed by Postgres, with sub-lists kept in `jsonb` columns.
#[derive(Clone)]
pub struct Postgres {
	database: Database,
}

impl Postgres {
	pub fn new(database: Database) -> Self {
		Self { database }
	}
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
	user_id: Uuid,
	name: String,
	avatar: String,
	company: Option<String>,
	website: Option<String>,
	location: Option<String>,
	bio: Option<String>,
	status: String,
	githubusername: Option<String>,
	skills: Vec<String>,
	social: Json<Social>,
	experience: Json<Vec<Experience>>,
	education: Json<Vec<Education>>,
	created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
	fn from(row: ProfileRow) -> Self {
		Self {
			user: Owner {
				id: row.user_id,
				name: row.name,
				avatar: row.avatar,
			},
			company: row.company,
			website: row.website,
			location: row.location,
			bio: row.bio,
			status: row.status,
			githubusername: row.githubusername,
			skills: row.skills,
			social: row.social.0,
			experience: row.experience.0,
			education: row.education.0,
			date: row.created_at,
		}
	}
}

#[derive(sqlx::FromRow)]
struct PostRow {
	id: Uuid,
	user_id: Uuid,
	name: String,
	avatar: String,
	text: String,
	likes: Json<Vec<Like>>,
	comments: Json<Vec<Comment>>,
	created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
	fn from(row: PostRow) -> Self {
		Self {
			id: row.id,
			user: row.user_id,
			name: row.name,
			avatar: row.avatar,
			text: row.text,
			likes: row.likes.0,
			comments: row.comments.0,
			date: row.created_at,
		}
	}
}

const SELECT_PROFILE: &str = r#"
	SELECT profile.*, "user".name, "user".avatar
	FROM profile
	JOIN "user" ON "user".id = profile.user_id
"#;

#[axum::async_trait]
impl UserStore for Postgres {
	async fn insert_user(&self, user: &User) -> Result<(), Error> {
		sqlx::query(
			r#"
				INSERT INTO "user" (id, name, email, avatar, password, created_at)
				VALUES ($1, $2, $3, $4, $5, $6)
			"#,
		)
		.bind(user.id)
		.bind(&user.name)
		.bind(&user.email)
		.bind(&user.avatar)
		.bind(&user.password)
		.bind(user.date)
		.execute(&self.database)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref d) if d.constraint() == Some("user_email_key") => {
				Error::Conflict("email")
			}
			e => Error::Database(e),
		})?;

		Ok(())
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, Error> {
		let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = $1"#)
			.bind(id)
			.fetch_optional(&self.database)
			.await?;

		Ok(user)
	}

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
		let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE email = $1"#)
			.bind(email)
			.fetch_optional(&self.database)
			.await?;

		Ok(user)
	}

	async fn delete_user(&self, id: Uuid) -> Result<bool, Error> {
		let status = sqlx::query(r#"DELETE FROM "user" WHERE id = $1"#)
			.bind(id)
			.execute(&self.database)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}

#[axum::async_trait]
impl ProfileStore for Postgres {
	async fn list_profiles(&self) -> Result<Vec<Profile>, Error> {
		let rows = sqlx::query_as::<_, ProfileRow>(&format!(
			"{SELECT_PROFILE} ORDER BY profile.created_at"
		))
		.fetch_all(&self.database)
		.await?;

		Ok(rows.into_iter().map(Profile::from).collect())
	}

	async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, Error> {
		let row = sqlx::query_as::<_, ProfileRow>(&format!(
			"{SELECT_PROFILE} WHERE profile.user_id = $1"
		))
		.bind(user_id)
		.fetch_optional(&self.database)
		.await?;

		Ok(row.map(Profile::from))
	}

	async fn save_profile(&self, profile: &Profile) -> Result<(), Error> {
		sqlx::query(
			r"
				INSERT INTO profile (
					user_id, company, website, location, bio, status, githubusername,
					skills, social, experience, education, created_at
				)
				VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
				ON CONFLICT (user_id) DO UPDATE SET
					company = EXCLUDED.company,
					website = EXCLUDED.website,
					location = EXCLUDED.location,
					bio = EXCLUDED.bio,
					status = EXCLUDED.status,
					githubusername = EXCLUDED.githubusername,
					skills = EXCLUDED.skills,
					social = EXCLUDED.social,
					experience = EXCLUDED.experience,
					education = EXCLUDED.education
			",
		)
		.bind(profile.user.id)
		.bind(&profile.company)
		.bind(&profile.website)
		.bind(&profile.location)
		.bind(&profile.bio)
		.bind(&profile.status)
		.bind(&profile.githubusername)
		.bind(&profile.skills)
		.bind(Json(&profile.social))
		.bind(Json(&profile.experience))
		.bind(Json(&profile.education))
		.bind(profile.date)
		.execute(&self.database)
		.await?;

		Ok(())
	}

	async fn delete_profile(&self, user_id: Uuid) -> Result<bool, Error> {
		let status = sqlx::query("DELETE FROM profile WHERE user_id = $1")
			.bind(user_id)
			.execute(&self.database)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}

#[axum::async_trait]
impl PostStore for Postgres {
	async fn list_posts(&self) -> Result<Vec<Post>, Error> {
		let rows = sqlx::query_as::<_, PostRow>("SELECT * FROM post ORDER BY created_at DESC")
			.fetch_all(&self.database)
			.await?;

		Ok(rows.into_iter().map(Post::from).collect())
	}

	async fn find_post(&self, id: Uuid) -> Result<Option<Post>, Error> {
		let row = sqlx::query_as::<_, PostRow>("SELECT * FROM post WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.database)
			.await?;

		Ok(row.map(Post::from))
	}

	async fn save_post(&self, post: &Post) -> Result<(), Error> {
		sqlx::query(
			r"
				INSERT INTO post (id, user_id, name, avatar, text, likes, comments, created_at)
				VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
				ON CONFLICT (id) DO UPDATE SET
					text = EXCLUDED.text,
					likes = EXCLUDED.likes,
					comments = EXCLUDED.comments
			",
		)
		.bind(post.id)
		.bind(post.user)
		.bind(&post.name)
		.bind(&post.avatar)
		.bind(&post.text)
		.bind(Json(&post.likes))
		.bind(Json(&post.comments))
		.bind(post.date)
		.execute(&self.database)
		.await?;

		Ok(())
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool, Error> {
		let status = sqlx::query("DELETE FROM post WHERE id = $1")
			.bind(id)
			.execute(&self.database)
			.await?;

		Ok(status.rows_affected() > 0)
	}
}
