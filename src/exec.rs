//! Process execution boundary.
//!
//! Every git query goes through an [`Executor`]. The strategy decides
//! whether a process is actually spawned: [`GitProcess`] runs it, [`DryRun`]
//! logs the command line and hands back a fixed placeholder instead.
use async_trait::async_trait;
use log::*;
use std::{
    path::PathBuf,
    process::{Command, Output},
};

use crate::{error::RollerError, result::Result};

/// Output returned by [`DryRun`] for every command.
pub const DRY_RUN_STDOUT: &str = "";

/// Options applied to a spawned process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Working directory, defaults to the current directory of the process.
    pub cwd: Option<PathBuf>,
}

impl ExecOptions {
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }
}

/// Runs external commands and returns their trimmed stdout.
///
/// The blocking and async forms must behave identically apart from timing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Executor: Send + Sync {
    /// True when commands are only logged and never spawned.
    fn dry_run(&self) -> bool;

    async fn exec(
        &self,
        command: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> Result<String>;

    fn exec_sync(
        &self,
        command: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> Result<String>;
}

/// Select the execution strategy for a run.
pub fn executor(dry_run: bool) -> Box<dyn Executor> {
    if dry_run {
        Box::new(DryRun)
    } else {
        Box::new(GitProcess)
    }
}

fn command_line(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        return command.to_string();
    }
    format!("{command} {}", args.join(" "))
}

fn into_stdout(command: String, output: Output) -> Result<String> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(RollerError::ProcessFailure {
            command,
            code: output.status.code(),
            stderr,
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitProcess;

#[async_trait]
impl Executor for GitProcess {
    fn dry_run(&self) -> bool {
        false
    }

    async fn exec(
        &self,
        command: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> Result<String> {
        let line = command_line(command, args);
        trace!("exec: {line}");

        let mut cmd = tokio::process::Command::new(command);
        cmd.args(args);
        if let Some(cwd) = &opts.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().await.map_err(|source| RollerError::Spawn {
            command: line.clone(),
            source,
        })?;

        into_stdout(line, output)
    }

    fn exec_sync(
        &self,
        command: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> Result<String> {
        let line = command_line(command, args);
        trace!("exec_sync: {line}");

        let mut cmd = Command::new(command);
        cmd.args(args);
        if let Some(cwd) = &opts.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().map_err(|source| RollerError::Spawn {
            command: line.clone(),
            source,
        })?;

        into_stdout(line, output)
    }
}

/// Never spawns anything; logs what would have run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

#[async_trait]
impl Executor for DryRun {
    fn dry_run(&self) -> bool {
        true
    }

    async fn exec(
        &self,
        command: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> Result<String> {
        self.exec_sync(command, args, opts)
    }

    fn exec_sync(
        &self,
        command: &str,
        args: &[String],
        _opts: &ExecOptions,
    ) -> Result<String> {
        info!("dry-run> {}", command_line(command, args));
        Ok(DRY_RUN_STDOUT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn formats_command_line() {
        assert_eq!(command_line("git", &[]), "git");
        assert_eq!(
            command_line("git", &args(&["rev-list", "--count", "abc1234"])),
            "git rev-list --count abc1234"
        );
    }

    #[test]
    fn dry_run_never_spawns() {
        let opts = ExecOptions::in_dir("/this/path/does/not/exist");
        let stdout = DryRun
            .exec_sync("definitely-not-a-real-binary", &[], &opts)
            .unwrap();

        assert_eq!(stdout, DRY_RUN_STDOUT);
        assert!(DryRun.dry_run());
    }

    #[tokio::test]
    async fn dry_run_async_matches_sync() {
        let opts = ExecOptions::default();
        let cmd_args = args(&["describe", "--always"]);
        let sync = DryRun.exec_sync("git", &cmd_args, &opts).unwrap();
        let not_sync = DryRun.exec("git", &cmd_args, &opts).await.unwrap();

        assert_eq!(sync, not_sync);
    }

    #[test]
    fn selects_strategy() {
        assert!(executor(true).dry_run());
        assert!(!executor(false).dry_run());
    }

    #[test]
    fn spawn_failure_is_classified() {
        let opts = ExecOptions::in_dir("/this/path/does/not/exist");
        let err = GitProcess.exec_sync("git", &args(&["status"]), &opts);

        let report = err.unwrap_err();
        let err = report.downcast_ref::<RollerError>().unwrap();
        assert!(matches!(err, RollerError::Spawn { .. }));
    }

    #[tokio::test]
    async fn async_spawn_failure_is_classified() {
        let opts = ExecOptions::in_dir("/this/path/does/not/exist");
        let err = GitProcess.exec("git", &args(&["status"]), &opts).await;

        let report = err.unwrap_err();
        let err = report.downcast_ref::<RollerError>().unwrap();
        assert!(matches!(err, RollerError::Spawn { .. }));
    }
}
