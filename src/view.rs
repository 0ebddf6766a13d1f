//! Display rows derived from a search outcome, free of any toolkit types.

use crate::models::{Candidate, Repository};
use crate::search::SearchOutcome;

pub const NO_REPOSITORIES: &str = "No Repository Found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRow {
    pub name: String,
    pub description: String,
    pub stars: String,
    pub url: String,
}

impl From<&Repository> for RepoRow {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            description: repo.description.clone().unwrap_or_default(),
            stars: repo.stargazers_count.to_string(),
            url: repo.html_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    pub login: String,
    pub expanded: bool,
    pub repos: Vec<RepoRow>,
    /// Shown in place of the repository list when it is empty.
    pub status: String,
    pub load_failed: bool,
}

impl CandidateRow {
    fn new(candidate: &Candidate, expanded: bool) -> Self {
        let status = match &candidate.load_error {
            Some(reason) => format!("Failed to load repositories: {reason}"),
            None if candidate.repositories.is_empty() => NO_REPOSITORIES.to_string(),
            None => String::new(),
        };
        Self {
            login: candidate.login.clone(),
            expanded,
            repos: candidate.repositories.iter().map(RepoRow::from).collect(),
            status,
            load_failed: candidate.load_error.is_some(),
        }
    }
}

/// Everything the window shows after a search completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub heading: String,
    pub candidates: Vec<CandidateRow>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl From<&SearchOutcome> for SearchView {
    fn from(outcome: &SearchOutcome) -> Self {
        let candidates: Vec<CandidateRow> = outcome
            .candidates()
            .iter()
            .enumerate()
            .map(|(index, candidate)| CandidateRow::new(candidate, index == 0))
            .collect();

        let heading = if candidates.is_empty() {
            String::new()
        } else {
            format!("Showing users for \"{}\"", outcome.query())
        };

        let error = match outcome {
            SearchOutcome::Failed { message, .. } => Some(format!("Search failed: {message}")),
            _ => None,
        };

        Self {
            heading,
            candidates,
            notice: outcome.notice(),
            error,
        }
    }
}
