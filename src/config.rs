use std::{env, fmt::Display, str::FromStr};

use tracing::level_filters::LevelFilter;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{key} is invalid: {message}")]
	Invalid { key: &'static str, message: String },
}

/// Process configuration, read once at startup and passed by reference
/// to whatever needs it.
#[derive(Clone)]
pub struct Config {
	pub database_url: String,
	pub jwt_secret: String,
	pub host: String,
	pub port: u16,
	/// Lifetime of issued session tokens.
	pub token_ttl: chrono::Duration,
	pub github: Github,
	/// When set, traces and metrics are exported over OTLP.
	pub otlp_endpoint: Option<String>,
	pub log_level: LevelFilter,
}

#[derive(Clone)]
pub struct Github {
	pub api_url: String,
	pub client_id: Option<String>,
	pub client_secret: Option<String>,
}

impl Default for Github {
	fn default() -> Self {
		Self {
			api_url: DEFAULT_GITHUB_API_URL.into(),
			client_id: None,
			client_secret: None,
		}
	}
}

impl Config {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Reads the configuration through `lookup`, which returns the value of a variable if it is set.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
	where
		F: Fn(&str) -> Option<String>,
	{
		let vars = Vars(lookup);
		let token_ttl: i64 = vars.parse_or("TOKEN_TTL_SECS", 3600)?;

		if token_ttl <= 0 {
			return Err(Error::Invalid {
				key: "TOKEN_TTL_SECS",
				message: "must be positive".into(),
			});
		}

		Ok(Self {
			database_url: vars.required("DATABASE_URL")?,
			jwt_secret: vars.required("JWT_SECRET")?,
			host: vars.get("HOST").unwrap_or_else(|| "127.0.0.1".into()),
			port: vars.parse_or("PORT", 5000)?,
			token_ttl: chrono::Duration::seconds(token_ttl),
			github: Github {
				api_url: vars
					.get("GITHUB_API_URL")
					.unwrap_or_else(|| DEFAULT_GITHUB_API_URL.into()),
				client_id: vars.get("GITHUB_CLIENT_ID"),
				client_secret: vars.get("GITHUB_SECRET"),
			},
			otlp_endpoint: vars.get("OTEL_EXPORTER_OTLP_ENDPOINT"),
			log_level: vars.parse_or("LOG_LEVEL", LevelFilter::INFO)?,
		})
	}
}

struct Vars<F>(F);

impl<F> Vars<F>
where
	F: Fn(&str) -> Option<String>,
{
	/// Empty values count as unset.
	fn get(&self, key: &str) -> Option<String> {
		(self.0)(key).filter(|value| !value.trim().is_empty())
	}

	fn required(&self, key: &'static str) -> Result<String, Error> {
		self.get(key).ok_or(Error::Missing(key))
	}

	fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, Error>
	where
		T: FromStr,
		T::Err: Display,
	{
		let Some(value) = self.get(key) else {
			return Ok(default);
		};

		value.trim().parse().map_err(|e: T::Err| Error::Invalid {
			key,
			message: e.to_string(),
		})
	}
}
