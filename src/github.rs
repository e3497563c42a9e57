use reqwest::StatusCode;

use crate::config;

/// Number of repositories returned for a Github user.
const REPOS_PER_PAGE: &str = "5";

/// Client for the public Github REST API.
#[derive(Clone)]
pub struct Client {
	http: reqwest::Client,
	api_url: String,
	credentials: Option<(String, String)>,
}

impl Client {
	pub fn new(config: &config::Github) -> reqwest::Result<Self> {
		let http = reqwest::Client::builder()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()?;

		let credentials = config
			.client_id
			.clone()
			.zip(config.client_secret.clone());

		Ok(Self {
			http,
			api_url: config.api_url.trim_end_matches('/').to_owned(),
			credentials,
		})
	}

	/// Lists the oldest repositories of `username`, or `None` if Github does not answer with 200.
	///
	/// The body is passed through untouched.
	pub async fn repositories(
		&self,
		username: &str,
	) -> reqwest::Result<Option<serde_json::Value>> {
		let mut request = self
			.http
			.get(format!("{}/users/{username}/repos", self.api_url))
			.query(&[("per_page", REPOS_PER_PAGE), ("sort", "created:asc")]);

		if let Some((id, secret)) = &self.credentials {
			request = request.query(&[("client_id", id), ("client_secret", secret)]);
		}

		let response = request.send().await?;

		if response.status() != StatusCode::OK {
			tracing::debug!(username, status = %response.status(), "github lookup failed");
			return Ok(None);
		}

		response.json().await.map(Some)
	}
}
