//! Subcommand execution.
use log::*;
use std::path::Path;

use crate::{
    cli::{Args, Command},
    exec::{Executor, GitProcess, executor},
    forge::factory::create_release_client,
    git::{
        branch::get_current_branch,
        describe::{describe_ref, describe_ref_sync},
    },
    release::{ReleaseNotes, ReleaseOptions, ReleaseProps, ReleasePublisher},
    result::Result,
};

/// Run the subcommand selected on the command line.
pub async fn execute(args: &Args) -> Result<()> {
    let exec = executor(args.dry_run);

    match &args.command {
        Command::Describe { sync, .. } => {
            describe(args, exec.as_ref(), *sync).await
        }
        Command::CurrentBranch => {
            let branch = get_current_branch(exec.as_ref(), &args.exec_options())?;
            println!("{branch}");
            Ok(())
        }
        Command::Release {
            client,
            tags,
            notes,
            git_remote,
        } => {
            let release_notes = load_release_notes(notes).await?;
            let props = ReleaseProps {
                tags: tags.clone(),
                release_notes,
            };
            let opts = ReleaseOptions {
                git_remote: git_remote.clone(),
                exec_opts: args.exec_options(),
            };
            // remote names resolve against local config even under dry-run
            let publisher = ReleasePublisher::new(
                create_release_client(client)?,
                Box::new(GitProcess),
                args.dry_run,
            );
            publisher.create_release(&props, &opts).await
        }
    }
}

async fn describe(args: &Args, exec: &dyn Executor, sync: bool) -> Result<()> {
    let Some(query) = args.describe_query() else {
        return Ok(());
    };

    let result = if sync {
        describe_ref_sync(exec, &query)?
    } else {
        describe_ref(exec, &query).await?
    };

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

async fn load_release_notes(path: &Path) -> Result<Vec<ReleaseNotes>> {
    debug!("loading release notes from {}", path.display());
    let content = tokio::fs::read_to_string(path).await?;
    let notes: Vec<ReleaseNotes> = serde_json::from_str(&content)?;
    Ok(notes)
}
