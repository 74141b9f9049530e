use octocrab::Octocrab;

mod get_check_run;
mod list_for_ref;

pub struct CheckHandler<'octo> {
    crab: &'octo Octocrab,
    owner: String,
    repo: String,
}

impl<'octo> CheckHandler<'octo> {
    pub(crate) fn new(crab: &'octo Octocrab, owner: String, repo: String) -> Self {
        Self { crab, owner, repo }
    }

    /// Lists check runs for a commit ref (a SHA, branch name or tag name).
    pub fn list_for_ref(&self, git_ref: impl Into<String>) -> list_for_ref::ListCheckRunsBuilder<'_, '_> {
        list_for_ref::ListCheckRunsBuilder::new(self, git_ref.into())
    }

    /// Gets a single check run using its `id`.
    pub fn get(&self, check_run_id: u64) -> get_check_run::GetCheckRunBuilder<'_, '_> {
        get_check_run::GetCheckRunBuilder::new(self, check_run_id)
    }
}
