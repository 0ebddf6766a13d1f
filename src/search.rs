//! User search joined with a concurrent per-user repository fetch.
//!
//! Every submission takes a [`SearchTicket`]. Only the holder of the most
//! recently issued ticket may publish; older outcomes are discarded when they
//! complete.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::client;
use crate::config::Config;
use crate::models::{Candidate, ResultSet};

/// What a finished search hands to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { query: String, candidates: ResultSet },
    NotFound { query: String },
    Failed { query: String, message: String },
}

impl SearchOutcome {
    pub fn query(&self) -> &str {
        match self {
            Self::Found { query, .. } | Self::NotFound { query } | Self::Failed { query, .. } => {
                query
            }
        }
    }

    /// Transient notification text, only for an empty result.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::NotFound { query } => Some(format!("Search with keyword \"{query}\" not found")),
            _ => None,
        }
    }

    /// The result set to render. Empty unless candidates were found.
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::Found { candidates, .. } => candidates,
            _ => &[],
        }
    }
}

/// Sequence number of one search submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

#[derive(Clone)]
pub struct SearchFlow {
    client: Client,
    api_url: Arc<str>,
    generation: Arc<AtomicU64>,
}

impl SearchFlow {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            client,
            api_url: api_url.trim_end_matches('/').into(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = client::build_client(config)?;
        Ok(Self::new(client, config.api_url.clone()))
    }

    /// Reads [`Config`] from the process environment and builds the client.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Every way of failing to get a usable flow ends up in the returned error:
    /// missing or invalid variables as well as a token that is not a valid
    /// header value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config::from_lookup(lookup)?;
        info!(api_url = %config.api_url, "configuration loaded");
        Self::from_config(&config)
    }

    /// Supersedes every previously issued ticket.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Hands `value` to `publish` only if `ticket` belongs to the most recently
    /// begun search. Returns whether it was published.
    ///
    /// Call it on the same thread that calls [`SearchFlow::begin`], so no newer
    /// search can begin between the check and the publish.
    pub fn publish_if_current<T, F>(&self, ticket: &SearchTicket, value: T, publish: F) -> bool
    where
        F: FnOnce(T),
    {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "discarding stale search outcome");
            return false;
        }
        publish(value);
        true
    }

    /// Searches users, then fetches every user's repositories concurrently and
    /// joins them in search order. Must be called inside a tokio runtime.
    pub async fn aggregate(&self, query: &str) -> SearchOutcome {
        info!(query, "searching users");

        let users = match client::search_users(&self.client, &self.api_url, query).await {
            Ok(users) => users,
            Err(e) => {
                let message = format!("{e:#}");
                error!(query, error = %message, "user search failed");
                return SearchOutcome::Failed {
                    query: query.to_string(),
                    message,
                };
            }
        };

        let mut handles = Vec::with_capacity(users.len());
        for user in &users {
            let client = self.client.clone();
            let repos_url = user.repos_url.clone();
            handles.push(tokio::spawn(async move {
                client::fetch_repositories(&client, &repos_url).await
            }));
        }

        let mut candidates = Vec::with_capacity(users.len());
        for (user, handle) in users.into_iter().zip(handles) {
            let candidate = match handle.await {
                Ok(Ok(repositories)) => Candidate::loaded(user, repositories),
                Ok(Err(e)) => {
                    let reason = format!("{e:#}");
                    warn!(login = %user.login, error = %reason, "repository fetch failed");
                    Candidate::failed(user, reason)
                }
                Err(e) => {
                    let reason = format!("repository fetch task failed: {e}");
                    warn!(login = %user.login, error = %reason, "repository fetch failed");
                    Candidate::failed(user, reason)
                }
            };
            candidates.push(candidate);
        }

        info!(query, candidates = candidates.len(), "search finished");

        if candidates.is_empty() {
            SearchOutcome::NotFound {
                query: query.to_string(),
            }
        } else {
            SearchOutcome::Found {
                query: query.to_string(),
                candidates,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn only_latest_ticket_is_current() {
        let flow = SearchFlow::new(Client::new(), "http://localhost");
        let first = flow.begin();
        assert!(flow.is_current(&first));

        let second = flow.begin();
        assert!(!flow.is_current(&first));
        assert!(flow.is_current(&second));
    }

    #[test]
    fn clones_share_the_sequence() {
        let flow = SearchFlow::new(Client::new(), "http://localhost");
        let other = flow.clone();
        let ticket = flow.begin();
        other.begin();
        assert!(!flow.is_current(&ticket));
    }

    #[test]
    fn publish_only_for_current_ticket() {
        let flow = SearchFlow::new(Client::new(), "http://localhost");
        let older = flow.begin();
        let newer = flow.begin();
        let mut published = Vec::new();

        assert!(!flow.publish_if_current(&older, "older", |v| published.push(v)));
        assert!(flow.publish_if_current(&newer, "newer", |v| published.push(v)));
        assert_eq!(published, vec!["newer"]);
    }

    #[test]
    fn token_rejected_by_header_is_an_error() {
        let result = SearchFlow::from_lookup(|key| match key {
            "GITHUB_TOKEN" => Some("line\nbreak".to_string()),
            _ => None,
        });
        let err = result.err().expect("token with a newline must not build a client");
        assert!(format!("{err:#}").contains("Invalid token value"), "{err:#}");
    }

    #[test]
    fn missing_token_surfaces_config_error() {
        let err = SearchFlow::from_lookup(|_| None).err().unwrap();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::MissingEnvVar("GITHUB_TOKEN"))
        );
    }

    #[test]
    fn notice_only_for_not_found() {
        let not_found = SearchOutcome::NotFound {
            query: "nobody here".into(),
        };
        assert_eq!(
            not_found.notice().as_deref(),
            Some("Search with keyword \"nobody here\" not found")
        );

        let failed = SearchOutcome::Failed {
            query: "x".into(),
            message: "offline".into(),
        };
        assert_eq!(failed.notice(), None);
        assert!(failed.candidates().is_empty());
        assert_eq!(failed.query(), "x");
    }
}
