use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::Config;
use crate::models::{Repository, SearchResponse, SearchUser};

/// Creates a preconfigured HTTP client with required headers.
pub fn build_client(config: &Config) -> Result<Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("github-repo-search"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github.v3+json"),
    );

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
        .context("Invalid token value")?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Searches GitHub users by query string, in the order GitHub ranks them.
pub async fn search_users(
    client: &Client,
    api_url: &str,
    query: &str,
) -> Result<Vec<SearchUser>> {
    let url = format!("{api_url}/search/users");

    let response = client
        .get(&url)
        .query(&[("q", query)])
        .send()
        .await
        .context("Failed to send search request")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("GitHub Search API error ({status}): {body}");
    }

    let search: SearchResponse = response
        .json()
        .await
        .context("Failed to deserialize search response")?;

    Ok(search.items)
}

/// Fetches the repository listing behind a user's `repos_url`.
pub async fn fetch_repositories(client: &Client, repos_url: &str) -> Result<Vec<Repository>> {
    let response = client
        .get(repos_url)
        .send()
        .await
        .context("Failed to send repositories request")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("GitHub API error ({status}): {body}");
    }

    response
        .json::<Vec<Repository>>()
        .await
        .context("Failed to deserialize repositories response")
}
