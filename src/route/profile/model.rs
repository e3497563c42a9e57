use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::route::{
	auth::model::User,
	model::{optional_date, present, remove_entry},
};

/// The public face of a profile's owner.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Owner {
	pub id: Uuid,
	pub name: String,
	pub avatar: String,
}

impl From<&User> for Owner {
	fn from(user: &User) -> Self {
		Self {
			id: user.id,
			name: user.name.clone(),
			avatar: user.avatar.clone(),
		}
	}
}

/// Links to the user's social accounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Social {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub youtube: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub twitter: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub facebook: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub linkedin: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub instagram: Option<String>,
}

impl Social {
	/// Overwrites the links present in `other`.
	fn merge(&mut self, other: Social) {
		let Social {
			youtube,
			twitter,
			facebook,
			linkedin,
			instagram,
		} = other;

		for (slot, value) in [
			(&mut self.youtube, youtube),
			(&mut self.twitter, twitter),
			(&mut self.facebook, facebook),
			(&mut self.linkedin, linkedin),
			(&mut self.instagram, instagram),
		] {
			if value.is_some() {
				*slot = value;
			}
		}
	}
}

/// A position held by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Experience {
	pub id: Uuid,
	pub title: String,
	pub company: String,
	pub location: Option<String>,
	pub from: NaiveDate,
	pub to: Option<NaiveDate>,
	pub current: bool,
	pub description: Option<String>,
}

/// A school attended by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Education {
	pub id: Uuid,
	pub school: String,
	pub degree: String,
	pub fieldofstudy: String,
	pub from: NaiveDate,
	pub to: Option<NaiveDate>,
	pub current: bool,
	pub description: Option<String>,
}

/// A user's profile. There is at most one per user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Profile {
	pub user: Owner,
	pub company: Option<String>,
	pub website: Option<String>,
	pub location: Option<String>,
	pub bio: Option<String>,
	pub status: String,
	pub githubusername: Option<String>,
	pub skills: Vec<String>,
	pub social: Social,
	/// Newest first.
	pub experience: Vec<Experience>,
	/// Newest first.
	pub education: Vec<Education>,
	pub date: DateTime<Utc>,
}

/// The fields submitted on a profile form. `None` leaves a field untouched.
#[derive(Debug, Default)]
pub struct ProfileFields {
	pub company: Option<String>,
	pub website: Option<String>,
	pub location: Option<String>,
	pub bio: Option<String>,
	pub status: Option<String>,
	pub githubusername: Option<String>,
	pub skills: Option<Vec<String>>,
	pub social: Social,
}

impl Profile {
	/// Creates a profile holding only the submitted fields.
	pub fn new(owner: Owner, fields: ProfileFields) -> Self {
		Self {
			user: owner,
			company: fields.company,
			website: fields.website,
			location: fields.location,
			bio: fields.bio,
			status: fields.status.unwrap_or_default(),
			githubusername: fields.githubusername,
			skills: fields.skills.unwrap_or_default(),
			social: fields.social,
			experience: Vec::new(),
			education: Vec::new(),
			date: Utc::now(),
		}
	}

	/// Overwrites the submitted fields and keeps everything else.
	pub fn apply(&mut self, fields: ProfileFields) {
		fn set<T>(slot: &mut T, value: Option<T>) {
			if let Some(value) = value {
				*slot = value;
			}
		}

		set(&mut self.company, fields.company.map(Some));
		set(&mut self.website, fields.website.map(Some));
		set(&mut self.location, fields.location.map(Some));
		set(&mut self.bio, fields.bio.map(Some));
		set(&mut self.status, fields.status);
		set(&mut self.githubusername, fields.githubusername.map(Some));
		set(&mut self.skills, fields.skills);

		self.social.merge(fields.social);
	}

	pub fn add_experience(&mut self, entry: Experience) {
		self.experience.insert(0, entry);
	}

	pub fn remove_experience(&mut self, id: Uuid) -> Option<Experience> {
		remove_entry(&mut self.experience, |entry| entry.id == id)
	}

	pub fn add_education(&mut self, entry: Education) {
		self.education.insert(0, entry);
	}

	pub fn remove_education(&mut self, id: Uuid) -> Option<Education> {
		remove_entry(&mut self.education, |entry| entry.id == id)
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ProfileInput {
	pub company: Option<String>,
	pub website: Option<String>,
	pub location: Option<String>,
	pub bio: Option<String>,
	#[serde(default)]
	#[validate(length(min = 1, message = "Status is required"))]
	pub status: String,
	pub githubusername: Option<String>,
	/// Comma-separated list of skills.
	#[serde(default)]
	#[validate(length(min = 1, message = "Skills is required"))]
	pub skills: String,
	pub youtube: Option<String>,
	pub twitter: Option<String>,
	pub facebook: Option<String>,
	pub linkedin: Option<String>,
	pub instagram: Option<String>,
}

impl From<ProfileInput> for ProfileFields {
	fn from(input: ProfileInput) -> Self {
		let skills = input
			.skills
			.split(',')
			.map(str::trim)
			.filter(|skill| !skill.is_empty())
			.map(str::to_owned)
			.collect();

		Self {
			company: present(input.company),
			website: present(input.website),
			location: present(input.location),
			bio: present(input.bio),
			status: present(Some(input.status)),
			githubusername: present(input.githubusername),
			skills: Some(skills),
			social: Social {
				youtube: present(input.youtube),
				twitter: present(input.twitter),
				facebook: present(input.facebook),
				linkedin: present(input.linkedin),
				instagram: present(input.instagram),
			},
		}
	}
}

fn missing_start_date() -> ValidationErrors {
	let mut error = ValidationError::new("required");
	error.message = Some(Cow::Borrowed("From date is required"));

	let mut errors = ValidationErrors::new();
	errors.add("from", error);
	errors
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ExperienceInput {
	#[serde(default)]
	#[validate(length(min = 1, message = "Title is required"))]
	pub title: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "Company is required"))]
	pub company: String,
	pub location: Option<String>,
	#[serde(default, deserialize_with = "optional_date")]
	#[validate(required(message = "From date is required"))]
	pub from: Option<NaiveDate>,
	#[serde(default, deserialize_with = "optional_date")]
	pub to: Option<NaiveDate>,
	#[serde(default)]
	pub current: bool,
	pub description: Option<String>,
}

impl TryFrom<ExperienceInput> for Experience {
	type Error = ValidationErrors;

	fn try_from(input: ExperienceInput) -> Result<Self, Self::Error> {
		Ok(Self {
			id: Uuid::new_v4(),
			title: input.title,
			company: input.company,
			location: present(input.location),
			from: input.from.ok_or_else(missing_start_date)?,
			to: input.to,
			current: input.current,
			description: present(input.description),
		})
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct EducationInput {
	#[serde(default)]
	#[validate(length(min = 1, message = "School is required"))]
	pub school: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "Degree is required"))]
	pub degree: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "Field of study is required"))]
	pub fieldofstudy: String,
	#[serde(default, deserialize_with = "optional_date")]
	#[validate(required(message = "From date is required"))]
	pub from: Option<NaiveDate>,
	#[serde(default, deserialize_with = "optional_date")]
	pub to: Option<NaiveDate>,
	#[serde(default)]
	pub current: bool,
	pub description: Option<String>,
}

impl TryFrom<EducationInput> for Education {
	type Error = ValidationErrors;

	fn try_from(input: EducationInput) -> Result<Self, Self::Error> {
		Ok(Self {
			id: Uuid::new_v4(),
			school: input.school,
			degree: input.degree,
			fieldofstudy: input.fieldofstudy,
			from: input.from.ok_or_else(missing_start_date)?,
			to: input.to,
			current: input.current,
			description: present(input.description),
		})
	}
}

fn validate_github_username(username: &str) -> Result<(), ValidationError> {
	let valid = !username.starts_with('-')
		&& username
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-');

	if !valid {
		return Err(ValidationError::new("invalid_github_username"));
	}

	Ok(())
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct GithubInput {
	#[validate(
		length(min = 1, max = 39),
		custom(function = "validate_github_username")
	)]
	pub username: String,
}

#[cfg(test)]
mod test {
	use super::*;

	fn owner() -> Owner {
		Owner {
			id: Uuid::new_v4(),
			name: "Ana".into(),
			avatar: "https://www.gravatar.com/avatar/0".into(),
		}
	}

	fn input(status: &str, skills: &str) -> ProfileInput {
		ProfileInput {
			company: None,
			website: None,
			location: None,
			bio: None,
			status: status.into(),
			githubusername: None,
			skills: skills.into(),
			youtube: None,
			twitter: None,
			facebook: None,
			linkedin: None,
			instagram: None,
		}
	}

	fn experience(title: &str) -> Experience {
		Experience {
			id: Uuid::new_v4(),
			title: title.into(),
			company: "Acme".into(),
			location: None,
			from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
			to: None,
			current: true,
			description: None,
		}
	}

	#[test]
	fn test_skills_are_split_and_trimmed() {
		let fields = ProfileFields::from(input("Developer", " rust, go ,, sql "));

		assert_eq!(fields.skills.unwrap(), ["rust", "go", "sql"]);
	}

	#[test]
	fn test_new_profile_initializes_social() {
		let profile = Profile::new(owner(), input("Developer", "rust").into());

		assert_eq!(profile.social, Social::default());
		assert!(profile.company.is_none());
		assert!(profile.experience.is_empty());
	}

	#[test]
	fn test_apply_is_partial() {
		let mut first = input("Developer", "rust");
		first.company = Some("Acme".into());
		first.twitter = Some("https://twitter.com/ana".into());

		let mut profile = Profile::new(owner(), first.into());
		profile.add_experience(experience("Engineer"));

		let mut second = input("Senior Developer", "rust, go");
		second.bio = Some("Hi".into());
		second.company = Some("   ".into());
		second.youtube = Some("https://youtube.com/ana".into());

		profile.apply(second.into());

		assert_eq!(profile.status, "Senior Developer");
		assert_eq!(profile.skills, ["rust", "go"]);
		assert_eq!(profile.company.as_deref(), Some("Acme"));
		assert_eq!(profile.bio.as_deref(), Some("Hi"));
		assert_eq!(
			profile.social.twitter.as_deref(),
			Some("https://twitter.com/ana")
		);
		assert_eq!(
			profile.social.youtube.as_deref(),
			Some("https://youtube.com/ana")
		);
		assert_eq!(profile.experience.len(), 1);
	}

	#[test]
	fn test_experience_is_newest_first() {
		let mut profile = Profile::new(owner(), input("Developer", "rust").into());

		profile.add_experience(experience("Junior"));
		profile.add_experience(experience("Senior"));

		let titles = profile
			.experience
			.iter()
			.map(|e| e.title.as_str())
			.collect::<Vec<_>>();

		assert_eq!(titles, ["Senior", "Junior"]);
	}

	#[test]
	fn test_add_then_remove_experience() {
		let mut profile = Profile::new(owner(), input("Developer", "rust").into());
		profile.add_experience(experience("Junior"));

		let before = profile.experience.clone();
		let entry = experience("Senior");
		let id = entry.id;

		profile.add_experience(entry);

		assert!(profile.remove_experience(id).is_some());
		assert_eq!(profile.experience, before);
	}

	#[test]
	fn test_remove_unknown_entry_is_a_miss() {
		let mut profile = Profile::new(owner(), input("Developer", "rust").into());
		profile.add_experience(experience("Junior"));

		let before = profile.experience.clone();

		assert!(profile.remove_experience(Uuid::new_v4()).is_none());
		assert!(profile.remove_education(Uuid::new_v4()).is_none());
		assert_eq!(profile.experience, before);
	}

	#[test]
	fn test_experience_requires_start_date() {
		let input = ExperienceInput {
			title: "Engineer".into(),
			company: "Acme".into(),
			location: None,
			from: None,
			to: None,
			current: false,
			description: None,
		};

		assert!(input.validate().is_err());

		let errors = Experience::try_from(input).unwrap_err();

		assert!(errors.field_errors().contains_key("from"));
	}

	#[test]
	fn test_github_username() {
		let valid = GithubInput {
			username: "octo-cat".into(),
		};
		let traversal = GithubInput {
			username: "../orgs".into(),
		};

		assert!(valid.validate().is_ok());
		assert!(traversal.validate().is_err());
	}
}
