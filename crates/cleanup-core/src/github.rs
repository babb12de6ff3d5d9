//! Pull-request state lookups against the GitHub REST API.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{CleanupError, Result};
use crate::filter::{PrState, PrStateSource};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("ci-cleanup/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct PullResponse {
    state: String,
}

pub struct GitHubClient {
    http: Client,
    base: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base(DEFAULT_API_BASE, token)
    }

    /// Base URL override, used by tests to point at a local mock server.
    pub fn with_base(base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

impl PrStateSource for GitHubClient {
    fn pr_state(&self, repo: &str, number: u64) -> Result<PrState> {
        let url = format!("{}/repos/{}/pulls/{}", self.base, repo, number);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(CleanupError::PrLookup {
                repo: repo.to_string(),
                number,
                status: status.as_u16(),
            });
        }
        let pull: PullResponse = response.json()?;
        // GitHub reports "open" or "closed"; merged PRs are "closed" too.
        Ok(if pull.state == "open" {
            PrState::Open
        } else {
            PrState::Closed
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_pull_request() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/repos/org/repo/pulls/7")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"state": "open", "number": 7}"#)
            .create();

        let client = GitHubClient::with_base(server.url(), "token");
        let state = client.pr_state("org/repo", 7).unwrap();
        assert_eq!(state, PrState::Open);
        mock.assert();
    }

    #[test]
    fn closed_pull_request() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/repos/org/repo/pulls/42")
            .with_status(200)
            .with_body(r#"{"state": "closed"}"#)
            .create();

        let client = GitHubClient::with_base(server.url(), "token");
        let state = client.pr_state("org/repo", 42).unwrap();
        assert_eq!(state, PrState::Closed);
    }

    #[test]
    fn not_found_is_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/repos/org/repo/pulls/404")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create();

        let client = GitHubClient::with_base(server.url(), "token");
        let err = client.pr_state("org/repo", 404).unwrap_err();
        assert!(matches!(
            err,
            CleanupError::PrLookup { status: 404, .. }
        ));
    }

    #[test]
    fn token_is_sent_as_bearer_auth() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/repos/org/repo/pulls/1")
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_body(r#"{"state": "closed"}"#)
            .create();

        let client = GitHubClient::with_base(server.url(), "secret-token");
        client.pr_state("org/repo", 1).unwrap();
        mock.assert();
    }
}
