//! CLI argument parsing.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{exec::ExecOptions, git::describe::DescribeQuery};

/// Default remote used to find the hosted repository.
pub const DEFAULT_GIT_REMOTE: &str = "origin";

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, global = true)]
    /// Repository directory. Defaults to the current directory.
    pub cwd: Option<PathBuf>,

    #[arg(long, default_value_t = false, global = true)]
    /// Log git commands and release requests instead of running them.
    pub dry_run: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe HEAD relative to the closest release tag and print the
    /// result as JSON.
    Describe {
        #[arg(long = "match")]
        /// Only consider tags matching this glob, e.g. "pkg-a@*".
        match_pattern: Option<String>,

        #[arg(long, default_value_t = false)]
        /// Also consider tags from merged branches.
        include_merged_tags: bool,

        #[arg(long, default_value_t = false)]
        /// Use the blocking git invocation.
        sync: bool,
    },

    /// Print the current branch.
    CurrentBranch,

    /// Create provider releases for freshly pushed tags.
    Release {
        #[arg(long, value_parser = ["github", "gitlab"])]
        /// Release provider.
        client: String,

        #[arg(long = "tag", required = true)]
        /// Tag created by the version bump. Repeat for each package.
        tags: Vec<String>,

        #[arg(long)]
        /// JSON file holding `[{"name": ..., "notes": ...}]` release notes.
        notes: PathBuf,

        #[arg(long, default_value = DEFAULT_GIT_REMOTE)]
        /// Remote name or URL of the hosted repository.
        git_remote: String,
    },
}

impl Args {
    pub fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            cwd: self.cwd.clone(),
        }
    }

    /// Describe query for the `describe` subcommand.
    pub fn describe_query(&self) -> Option<DescribeQuery> {
        match &self.command {
            Command::Describe {
                match_pattern,
                include_merged_tags,
                ..
            } => Some(DescribeQuery {
                match_pattern: match_pattern.clone(),
                include_merged_tags: *include_merged_tags,
                cwd: self.cwd.clone(),
            }),
            _ => None,
        }
    }
}
