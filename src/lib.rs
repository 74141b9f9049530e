// Copyright 2022 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// OR
//
// Licensed under the MIT License. See LICENSE-MIT for details.

//! Requests a staging build through a Cloud Build webhook and waits for the
//! resulting GitHub check run to complete.

use std::fmt;

pub mod checks;
pub mod config;
pub mod locator;
pub mod octocrab_extra;
pub mod orchestrator;
pub mod requester;

#[cfg(test)]
mod test_support;

pub use checks::{ApiError, ChecksApi, GitHubChecks};
pub use config::{ConfigError, GitHubConfig, StageConfig, WebhookConfig};
pub use locator::find_check;
pub use octocrab_extra::models::checks::{CheckRun, CheckRunConclusion, CheckRunStatus};
pub use orchestrator::{Stage, StageError, StagingOrchestrator};
pub use requester::{BuildRequester, BuildTrigger, CloudBuildWebhook, RequestError};

/// The commit a staging build is requested for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommitRef(String);

impl CommitRef {
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
