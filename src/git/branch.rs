use log::*;

use crate::{
    exec::{ExecOptions, Executor},
    git::{GIT, git_args},
    result::Result,
};

/// Branch reported when commands are not actually run.
pub const DRY_RUN_BRANCH: &str = "main";

/// Name of the branch HEAD points at.
pub fn get_current_branch(
    exec: &dyn Executor,
    opts: &ExecOptions,
) -> Result<String> {
    trace!("resolving current branch");
    let branch = exec.exec_sync(
        GIT,
        &git_args(&["rev-parse", "--abbrev-ref", "HEAD"]),
        opts,
    )?;
    debug!("current branch: {branch}");

    if exec.dry_run() {
        return Ok(DRY_RUN_BRANCH.to_string());
    }

    Ok(branch)
}
