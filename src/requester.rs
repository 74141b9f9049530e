use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::config::WebhookConfig;
use crate::CommitRef;

/// Acknowledgement that the webhook accepted a build request.
///
/// Carries no check id: Cloud Build does not say which check run the build
/// will report to, so the run has to be found by name afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildTrigger {
    pub commit: CommitRef,
}

/// Starts a remote build for a commit.
///
/// There is no idempotency key, so every successful call may schedule a
/// build. Implementations must not retry on their own.
#[async_trait]
pub trait BuildRequester {
    async fn request_build(&self, commit: &CommitRef) -> Result<BuildTrigger, RequestError>;
}

#[derive(serde::Serialize)]
struct WebhookPayload<'a> {
    #[serde(rename = "COMMIT_SHA")]
    commit_sha: &'a str,
}

pub struct CloudBuildWebhook {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl CloudBuildWebhook {
    pub fn new(config: WebhookConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: WebhookConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl BuildRequester for CloudBuildWebhook {
    async fn request_build(&self, commit: &CommitRef) -> Result<BuildTrigger, RequestError> {
        let response = self
            .client
            .post(&self.config.url)
            .query(&[
                ("key", self.config.key.as_str()),
                ("secret", self.config.secret.as_str()),
            ])
            .json(&WebhookPayload {
                commit_sha: commit.as_str(),
            })
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.without_url()))?;

        // The body only confirms receipt; the build itself may not exist yet.
        let _: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RequestError::InvalidBody(e.without_url()))?;

        Ok(BuildTrigger {
            commit: commit.clone(),
        })
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum RequestError {
    #[error("could not reach the build webhook")]
    Transport(#[source] reqwest::Error),
    #[error("build webhook did not answer with JSON")]
    InvalidBody(#[source] reqwest::Error),
}
