use std::fmt;
use std::ops::ControlFlow;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::checks::{ApiError, ChecksApi};
use crate::config::StageConfig;
use crate::locator::find_check;
use crate::octocrab_extra::models::checks::CheckRun;
use crate::requester::{BuildRequester, RequestError};
use crate::CommitRef;

/// Where a staging run is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Init,
    Requested,
    AwaitingPropagation,
    Locating,
    Polling,
    Succeeded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Requested => "requested",
            Self::AwaitingPropagation => "awaiting_propagation",
            Self::Locating => "locating",
            Self::Polling => "polling",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
enum State {
    Init,
    Requested,
    AwaitingPropagation,
    Locating,
    Polling { check_id: u64, polls: u32 },
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            Self::Init => Stage::Init,
            Self::Requested => Stage::Requested,
            Self::AwaitingPropagation => Stage::AwaitingPropagation,
            Self::Locating => Stage::Locating,
            Self::Polling { .. } => Stage::Polling,
        }
    }
}

/// Requests one staging build and waits until its check run completes.
///
/// A run ends as soon as the check reports `completed`, whatever its
/// conclusion; judging the build is left to the caller. The orchestrator is
/// consumed by [`run`](Self::run), so each instance issues at most one build
/// request.
pub struct StagingOrchestrator<R, C> {
    requester: R,
    checks: C,
    commit: CommitRef,
    check_name: String,
    propagation_delay: Duration,
    poll_interval: Duration,
    max_polls: Option<u32>,
}

impl<R, C> StagingOrchestrator<R, C>
where
    R: BuildRequester,
    C: ChecksApi,
{
    pub fn new(config: &StageConfig, requester: R, checks: C) -> Self {
        Self {
            requester,
            checks,
            commit: config.commit.clone(),
            check_name: config.check_name.clone(),
            propagation_delay: config.propagation_delay,
            poll_interval: config.poll_interval,
            max_polls: config.max_polls,
        }
    }

    pub async fn run(self) -> Result<CheckRun, StageError> {
        let mut state = State::Init;
        loop {
            let from = state.stage();
            state = match self.step(state).await {
                Ok(ControlFlow::Continue(next)) => next,
                Ok(ControlFlow::Break(run)) => {
                    debug!(from = %from, to = %Stage::Succeeded, "stage transition");
                    return Ok(run);
                }
                Err(err) => {
                    debug!(from = %from, to = %Stage::Failed, "stage transition");
                    warn!(stage = %err.stage(), error = %err, "staging run failed");
                    return Err(err);
                }
            };
            if from != state.stage() {
                debug!(from = %from, to = %state.stage(), "stage transition");
            }
        }
    }

    async fn step(&self, state: State) -> Result<ControlFlow<CheckRun, State>, StageError> {
        let next = match state {
            State::Init => {
                info!(commit = %self.commit, "Requesting staging build");
                let trigger = self
                    .requester
                    .request_build(&self.commit)
                    .await
                    .map_err(StageError::RequestBuild)?;
                info!(commit = %trigger.commit, "Requested staging build.");
                State::Requested
            }
            State::Requested => State::AwaitingPropagation,
            State::AwaitingPropagation => {
                info!(
                    delay_secs = self.propagation_delay.as_secs(),
                    "Waiting for Cloud Build job to start ..."
                );
                tokio::time::sleep(self.propagation_delay).await;
                State::Locating
            }
            State::Locating => {
                info!(commit = %self.commit, "Fetching checks for commit ...");
                let checks = self
                    .checks
                    .list_checks_for_commit(&self.commit)
                    .await
                    .map_err(StageError::Locate)?;
                let build = find_check(&checks, &self.check_name).ok_or_else(|| {
                    StageError::BuildNotFound {
                        name: self.check_name.clone(),
                    }
                })?;
                info!(check_id = build.id, "Waiting for Cloud Build to finish ...");
                State::Polling {
                    check_id: build.id,
                    polls: 0,
                }
            }
            State::Polling { check_id, polls } => {
                if self.max_polls.is_some_and(|max| polls >= max) {
                    return Err(StageError::PollLimitReached { polls });
                }
                tokio::time::sleep(self.poll_interval).await;
                let run = self
                    .checks
                    .get_check_by_id(check_id)
                    .await
                    .map_err(StageError::Poll)?;
                let polls = polls + 1;
                debug!(check_id, polls, status = %run.status, "polled check run");
                if run.is_terminal() {
                    info!("Staging build finished.");
                    return Ok(ControlFlow::Break(run));
                }
                State::Polling { check_id, polls }
            }
        };
        Ok(ControlFlow::Continue(next))
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum StageError {
    #[error("could not request build")]
    #[diagnostic(help("requests are never retried automatically; re-run the job to try again"))]
    RequestBuild(#[source] RequestError),
    #[error("could not determine build status: no check run named `{name}`")]
    BuildNotFound { name: String },
    #[error("could not determine build status")]
    Locate(#[source] ApiError),
    #[error("could not determine build status")]
    Poll(#[source] ApiError),
    #[error("gave up waiting for build status after {polls} polls")]
    PollLimitReached { polls: u32 },
}

impl StageError {
    /// The stage the run was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::RequestBuild(_) => Stage::Init,
            Self::BuildNotFound { .. } | Self::Locate(_) => Stage::Locating,
            Self::Poll(_) | Self::PollLimitReached { .. } => Stage::Polling,
        }
    }
}
