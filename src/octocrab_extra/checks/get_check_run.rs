use crate::octocrab_extra::models::checks::CheckRun;

pub struct GetCheckRunBuilder<'octo, 'r> {
    handler: &'r super::CheckHandler<'octo>,
    check_run_id: u64,
}

impl<'octo, 'r> GetCheckRunBuilder<'octo, 'r> {
    pub fn new(handler: &'r super::CheckHandler<'octo>, check_run_id: u64) -> Self {
        Self {
            handler,
            check_run_id,
        }
    }

    /// Send the actual request.
    pub async fn send(self) -> octocrab::Result<CheckRun> {
        let route = format!(
            "/repos/{owner}/{repo}/check-runs/{check_run_id}",
            owner = self.handler.owner,
            repo = self.handler.repo,
            check_run_id = self.check_run_id,
        );

        self.handler.crab.get(route, None::<&()>).await
    }
}
