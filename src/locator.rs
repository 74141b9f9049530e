use crate::octocrab_extra::models::checks::CheckRun;

/// Returns the first check run named exactly `name`.
///
/// `None` is an expected answer while Cloud Build has not reported back to
/// GitHub yet, not an error.
pub fn find_check<'a>(checks: &'a [CheckRun], name: &str) -> Option<&'a CheckRun> {
    checks.iter().find(|run| run.name == name)
}
