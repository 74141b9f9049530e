use octocrab::Octocrab;

pub mod models {
    pub mod checks;
}
mod checks;

pub use checks::CheckHandler;

pub trait OctocrabExt {
    fn check_runs(&self, owner: impl Into<String>, repo: impl Into<String>) -> checks::CheckHandler<'_>;
}

impl OctocrabExt for Octocrab {
    fn check_runs(&self, owner: impl Into<String>, repo: impl Into<String>) -> checks::CheckHandler<'_> {
        checks::CheckHandler::new(self, owner.into(), repo.into())
    }
}
