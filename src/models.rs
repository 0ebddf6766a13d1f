use serde::Deserialize;

/// Response from the GitHub Search Users API (`/search/users`).
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchUser>,
}

/// A single user item from the search results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchUser {
    pub id: u64,
    pub login: String,
    pub repos_url: String,
}

/// A repository from a user's `repos_url` listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub stargazers_count: u64,
    #[serde(default)]
    pub html_url: String,
}

/// One searched account joined with its repositories.
///
/// `repositories` is always present; when the per-account fetch failed it is
/// empty and `load_error` carries the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: u64,
    pub login: String,
    pub repos_url: String,
    pub repositories: Vec<Repository>,
    pub load_error: Option<String>,
}

impl Candidate {
    pub fn loaded(user: SearchUser, repositories: Vec<Repository>) -> Self {
        Self {
            id: user.id,
            login: user.login,
            repos_url: user.repos_url,
            repositories,
            load_error: None,
        }
    }

    pub fn failed(user: SearchUser, reason: String) -> Self {
        Self {
            id: user.id,
            login: user.login,
            repos_url: user.repos_url,
            repositories: Vec::new(),
            load_error: Some(reason),
        }
    }
}

/// Candidates in the order the search call returned them.
pub type ResultSet = Vec<Candidate>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_ignores_extra_fields() {
        let body = r#"{
            "total_count": 1,
            "incomplete_results": false,
            "items": [{
                "id": 1,
                "login": "octocat",
                "repos_url": "https://api.github.com/users/octocat/repos",
                "avatar_url": "https://avatars.githubusercontent.com/u/1",
                "type": "User"
            }]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].login, "octocat");
    }

    #[test]
    fn repository_allows_null_description() {
        let body = r#"{"name": "spoon-knife", "description": null, "stargazers_count": 12}"#;
        let repo: Repository = serde_json::from_str(body).unwrap();
        assert_eq!(repo.description, None);
        assert_eq!(repo.stargazers_count, 12);
        assert!(repo.html_url.is_empty());
    }

    #[test]
    fn failed_candidate_has_empty_repositories() {
        let user = SearchUser {
            id: 7,
            login: "ghost".into(),
            repos_url: "https://api.github.com/users/ghost/repos".into(),
        };
        let candidate = Candidate::failed(user, "boom".into());
        assert!(candidate.repositories.is_empty());
        assert_eq!(candidate.load_error.as_deref(), Some("boom"));
    }
}
