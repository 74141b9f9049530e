use crate::octocrab_extra::models::checks::CheckRunList;

#[derive(serde::Serialize)]
pub struct ListCheckRunsBuilder<'octo, 'r> {
    #[serde(skip)]
    handler: &'r super::CheckHandler<'octo>,
    #[serde(skip)]
    git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    per_page: Option<u8>,
}

impl<'octo, 'r> ListCheckRunsBuilder<'octo, 'r> {
    pub fn new(handler: &'r super::CheckHandler<'octo>, git_ref: String) -> Self {
        Self {
            handler,
            git_ref,
            per_page: None,
        }
    }

    /// The number of results per page (max 100).
    pub fn per_page(mut self, per_page: impl Into<u8>) -> Self {
        self.per_page = Some(per_page.into());
        self
    }

    /// Send the actual request.
    pub async fn send(self) -> octocrab::Result<CheckRunList> {
        let route = format!(
            "/repos/{owner}/{repo}/commits/{git_ref}/check-runs",
            owner = self.handler.owner,
            repo = self.handler.repo,
            git_ref = self.git_ref,
        );

        self.handler.crab.get(route, Some(&self)).await
    }
}
