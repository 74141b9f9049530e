use async_trait::async_trait;
use miette::Diagnostic;
use octocrab::Octocrab;
use thiserror::Error;

use crate::config::GitHubConfig;
use crate::octocrab_extra::OctocrabExt;
use crate::octocrab_extra::models::checks::CheckRun;
use crate::CommitRef;

/// GitHub's maximum page size; staging commits carry far fewer checks.
const CHECK_RUNS_PER_PAGE: u8 = 100;

/// Read access to the check runs of one repository.
///
/// Calls are single attempts. Whether and how to repeat them is up to the
/// caller.
#[async_trait]
pub trait ChecksApi {
    async fn list_checks_for_commit(&self, commit: &CommitRef) -> Result<Vec<CheckRun>, ApiError>;

    async fn get_check_by_id(&self, id: u64) -> Result<CheckRun, ApiError>;
}

pub struct GitHubChecks {
    crab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubChecks {
    pub fn new(crab: Octocrab, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            crab,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn from_config(config: &GitHubConfig) -> Result<Self, ApiError> {
        let crab = Octocrab::builder()
            .user_access_token(config.token.clone())
            .build()
            .map_err(|source| ApiError::new("build GitHub client", source))?;
        Ok(Self::new(crab, &config.owner, &config.repo))
    }
}

#[async_trait]
impl ChecksApi for GitHubChecks {
    async fn list_checks_for_commit(&self, commit: &CommitRef) -> Result<Vec<CheckRun>, ApiError> {
        let list = self
            .crab
            .check_runs(&self.owner, &self.repo)
            .list_for_ref(commit.as_str())
            .per_page(CHECK_RUNS_PER_PAGE)
            .send()
            .await
            .map_err(|source| ApiError::new("list check runs", source))?;
        Ok(list.check_runs)
    }

    async fn get_check_by_id(&self, id: u64) -> Result<CheckRun, ApiError> {
        self.crab
            .check_runs(&self.owner, &self.repo)
            .get(id)
            .send()
            .await
            .map_err(|source| ApiError::new("get check run", source))
    }
}

/// A failed call against the GitHub checks API: transport, non-2xx status or
/// a body that did not deserialize.
#[derive(Error, Diagnostic, Debug)]
#[error("GitHub API call failed: {operation}")]
pub struct ApiError {
    operation: &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl ApiError {
    pub fn new(
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octocrab_extra::models::checks::{CheckRunConclusion, CheckRunStatus};
    use crate::test_support::serve_once;

    fn client(base: String) -> GitHubChecks {
        let crab = Octocrab::builder()
            .base_uri(base)
            .unwrap()
            .user_access_token("ghs_example".to_string())
            .build()
            .unwrap();
        GitHubChecks::new(crab, "o", "r")
    }

    #[tokio::test]
    async fn lists_check_runs_for_commit() {
        let body = r#"{"total_count":2,"check_runs":[
            {"id":4,"name":"lint","status":"completed","conclusion":"success"},
            {"id":5,"name":"Build (dcc-staging)","status":"queued","conclusion":null}
        ]}"#;
        let (base, server) = serve_once("200 OK", "application/json", body).await;

        let runs = client(base)
            .list_checks_for_commit(&CommitRef::new("abc"))
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request
            .starts_with("GET /repos/o/r/commits/abc/check-runs?per_page=100 HTTP/1.1\r\n"));
        assert!(request.contains("ghs_example"));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].id, 5);
        assert_eq!(runs[1].status, CheckRunStatus::Queued);
    }

    #[tokio::test]
    async fn gets_check_run_by_id() {
        let body = r#"{"id":5,"name":"Build (dcc-staging)","status":"completed","conclusion":"failure"}"#;
        let (base, server) = serve_once("200 OK", "application/json", body).await;

        let run = client(base).get_check_by_id(5).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /repos/o/r/check-runs/5 HTTP/1.1\r\n"));
        assert!(run.is_terminal());
        assert_eq!(run.conclusion, Some(CheckRunConclusion::Failure));
    }

    #[tokio::test]
    async fn not_found_is_an_api_error() {
        let body = r#"{"message":"Not Found","documentation_url":"https://docs.github.com/rest"}"#;
        let (base, server) = serve_once("404 Not Found", "application/json", body).await;

        let err = client(base).get_check_by_id(5).await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err.to_string(), "GitHub API call failed: get check run");
    }

    #[tokio::test]
    async fn malformed_listing_is_an_api_error() {
        let (base, server) = serve_once("200 OK", "application/json", r#"{"check_runs":"#).await;

        let err = client(base)
            .list_checks_for_commit(&CommitRef::new("abc"))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert_eq!(err.to_string(), "GitHub API call failed: list check runs");
    }
}
