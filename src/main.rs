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

use miette::Context;
use stage_build::{
    CheckRunConclusion, CloudBuildWebhook, GitHubChecks, StageConfig, StagingOrchestrator,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    if std::env::var_os("GITHUB_ACTION").is_none() {
        warn!(
            "This task is intended to run on GitHub Actions. Use `npm run stage:personal` locally instead."
        );
        return Ok(());
    }

    let config = StageConfig::from_env().wrap_err("invalid staging configuration")?;
    info!(
        commit = %config.commit,
        github_sha = config.github_sha.as_deref().unwrap_or("unknown"),
        owner = %config.github.owner,
        repo = %config.github.repo,
        "Staging commit"
    );

    let requester = CloudBuildWebhook::new(config.webhook.clone());
    let checks = GitHubChecks::from_config(&config.github)?;
    let run = StagingOrchestrator::new(&config, requester, checks)
        .run()
        .await?;

    let url = run.html_url.as_deref().or(run.details_url.as_deref()).unwrap_or("-");
    match run.conclusion {
        Some(CheckRunConclusion::Success) => {
            info!(check_id = run.id, url, "Staging build succeeded.");
            Ok(())
        }
        Some(conclusion) => {
            miette::bail!("staging build `{}` concluded with {} ({})", run.name, conclusion, url)
        }
        None => miette::bail!("staging build `{}` completed without a conclusion ({})", run.name, url),
    }
}
