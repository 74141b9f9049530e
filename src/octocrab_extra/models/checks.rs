use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CheckRunStatus {
    Queued,
    InProgress,
    Completed,
    /// Statuses GitHub may report that this tool does not act on, such as
    /// `waiting` or `pending`. They are never terminal.
    #[serde(other)]
    Other,
}

impl fmt::Display for CheckRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CheckRunConclusion {
    ActionRequired,
    Cancelled,
    Failure,
    Neutral,
    Success,
    Skipped,
    Stale,
    TimedOut,
}

impl fmt::Display for CheckRunConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ActionRequired => "action_required",
            Self::Cancelled => "cancelled",
            Self::Failure => "failure",
            Self::Neutral => "neutral",
            Self::Success => "success",
            Self::Skipped => "skipped",
            Self::Stale => "stale",
            Self::TimedOut => "timed_out",
        };
        f.write_str(s)
    }
}

/// A check performed on the code of a given code change
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckRun {
    /// The id of the check.
    pub id: u64,
    /// The name of the check, e.g. `Build (dcc-staging)`.
    pub name: String,
    /// The SHA of the commit that is being checked.
    #[serde(default)]
    pub head_sha: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub details_url: Option<String>,
    /// The phase of the lifecycle that the check is currently in.
    pub status: CheckRunStatus,
    #[serde(default)]
    pub conclusion: Option<CheckRunConclusion>,
    #[serde(default)]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl CheckRun {
    pub fn new(id: u64, name: impl Into<String>, status: CheckRunStatus) -> Self {
        Self {
            id,
            name: name.into(),
            head_sha: None,
            html_url: None,
            details_url: None,
            status,
            conclusion: None,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn with_conclusion(mut self, conclusion: CheckRunConclusion) -> Self {
        self.conclusion = Some(conclusion);
        self
    }

    /// A check run never leaves the `completed` status once it reaches it.
    pub fn is_terminal(&self) -> bool {
        self.status == CheckRunStatus::Completed
    }
}

/// Response of `GET /repos/{owner}/{repo}/commits/{ref}/check-runs`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckRunList {
    pub total_count: u64,
    pub check_runs: Vec<CheckRun>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_github_check_run() {
        let json = serde_json::json!({
            "id": 4,
            "head_sha": "ce587453ced02b1526dfb4cb910479d431683101",
            "node_id": "MDg6Q2hlY2tSdW40",
            "external_id": "",
            "url": "https://api.github.com/repos/github/hello-world/check-runs/4",
            "html_url": "https://github.com/github/hello-world/runs/4",
            "details_url": "https://example.com",
            "status": "completed",
            "conclusion": "neutral",
            "started_at": "2018-05-04T01:14:52Z",
            "completed_at": "2018-05-04T01:14:52Z",
            "name": "mighty_readme",
            "pull_requests": []
        });

        let run: CheckRun = serde_json::from_value(json).unwrap();
        assert_eq!(run.id, 4);
        assert_eq!(run.name, "mighty_readme");
        assert_eq!(run.conclusion, Some(CheckRunConclusion::Neutral));
        assert!(run.is_terminal());
        assert!(run.completed_at.is_some());
    }

    #[test]
    fn in_progress_run_has_null_conclusion() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Build (dcc-staging)",
            "status": "in_progress",
            "conclusion": null
        });

        let run: CheckRun = serde_json::from_value(json).unwrap();
        assert_eq!(run.status, CheckRunStatus::InProgress);
        assert_eq!(run.conclusion, None);
        assert!(!run.is_terminal());
    }

    #[test]
    fn unknown_status_is_not_terminal() {
        let json = serde_json::json!({ "id": 1, "name": "x", "status": "waiting" });

        let run: CheckRun = serde_json::from_value(json).unwrap();
        assert_eq!(run.status, CheckRunStatus::Other);
        assert!(!run.is_terminal());
    }

    #[test]
    fn deserializes_check_run_list() {
        let json = serde_json::json!({
            "total_count": 2,
            "check_runs": [
                { "id": 1, "name": "lint", "status": "completed", "conclusion": "success" },
                { "id": 2, "name": "Build (dcc-staging)", "status": "queued", "conclusion": null }
            ]
        });

        let list: CheckRunList = serde_json::from_value(json).unwrap();
        assert_eq!(list.total_count, 2);
        assert_eq!(list.check_runs[1].status, CheckRunStatus::Queued);
    }
}
