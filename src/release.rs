//! Publish releases for the tags produced by a version bump.
//!
//! Each release note group is matched to its tag, either the single shared
//! tag in fixed mode or the `name@version` tag in independent mode. Groups
//! without a tag are dropped before any request is built, so only resolved
//! groups ever reach the release client. All requests run concurrently as
//! tokio tasks.
use log::*;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::{
    exec::{ExecOptions, Executor},
    forge::{traits::ReleaseClient, types::CreateReleaseRequest},
    git::remote::{GitRepo, parse_git_repo},
    result::Result,
};

/// Release note group name used when every package shares one version.
pub const FIXED_GROUP: &str = "fixed";

/// Generated notes for one package, or for all packages in fixed mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNotes {
    pub name: String,
    pub notes: String,
}

/// Output of the bump and changelog steps.
#[derive(Debug, Clone, Default)]
pub struct ReleaseProps {
    pub tags: Vec<String>,
    pub release_notes: Vec<ReleaseNotes>,
}

#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Remote URL (SSH or HTTPS) or configured remote name.
    pub git_remote: String,
    pub exec_opts: ExecOptions,
}

/// Tag released for a note group, if any.
pub fn resolve_tag<'a>(group: &str, tags: &'a [String]) -> Option<&'a str> {
    if group == FIXED_GROUP {
        return tags.first().map(String::as_str);
    }

    let prefix = format!("{group}@");
    tags.iter()
        .find(|tag| tag.starts_with(&prefix))
        .map(String::as_str)
}

/// True when `version` is valid semver with prerelease identifiers. A
/// leading `v` or `=` is accepted, anything unparseable is not a prerelease.
pub fn is_prerelease(version: &str) -> bool {
    let version = version.trim().trim_start_matches(['v', '=']);

    Version::parse(version)
        .map(|v| !v.pre.is_empty())
        .unwrap_or(false)
}

/// Build one release request per note group that resolves to a tag.
pub fn release_requests(
    repo: &GitRepo,
    tags: &[String],
    release_notes: &[ReleaseNotes],
) -> Vec<CreateReleaseRequest> {
    release_notes
        .iter()
        .filter_map(|group| {
            resolve_tag(&group.name, tags).map(|tag| (group, tag))
        })
        .map(|(group, tag)| {
            let prefix = format!("{}@", group.name);
            let version = tag.strip_prefix(&prefix).unwrap_or(tag);

            CreateReleaseRequest {
                owner: repo.owner.clone(),
                repo: repo.name.clone(),
                tag_name: tag.to_string(),
                name: tag.to_string(),
                body: group.notes.clone(),
                draft: false,
                prerelease: is_prerelease(version),
            }
        })
        .collect()
}

/// Sends releases through a single provider client.
pub struct ReleasePublisher {
    client: Arc<dyn ReleaseClient>,
    exec: Box<dyn Executor>,
    dry_run: bool,
}

impl ReleasePublisher {
    /// `exec` resolves remote names to URLs; `dry_run` only governs the
    /// provider requests.
    pub fn new(
        client: Box<dyn ReleaseClient>,
        exec: Box<dyn Executor>,
        dry_run: bool,
    ) -> Self {
        Self {
            client: Arc::from(client),
            exec,
            dry_run,
        }
    }

    /// Create every resolvable release.
    ///
    /// Waits for all requests to settle; if any failed, the first failure
    /// (in release note order) is returned.
    pub async fn create_release(
        &self,
        props: &ReleaseProps,
        opts: &ReleaseOptions,
    ) -> Result<()> {
        let repo =
            parse_git_repo(self.exec.as_ref(), &opts.git_remote, &opts.exec_opts)
                .await?;
        let requests =
            release_requests(&repo, &props.tags, &props.release_notes);

        if self.dry_run {
            for req in requests.iter() {
                warn!(
                    "dry_run: would create {} release: tag: {}, prerelease: {}",
                    self.client.client_type(),
                    req.tag_name,
                    req.prerelease
                );
            }
            return Ok(());
        }

        info!(
            "creating {} {} release(s) for {}/{}",
            requests.len(),
            self.client.client_type(),
            repo.owner,
            repo.name
        );

        let mut set = JoinSet::new();
        for (index, req) in requests.into_iter().enumerate() {
            let client = Arc::clone(&self.client);
            set.spawn(async move { (index, client.create_release(req).await) });
        }

        // drain the set so no in-flight request is aborted on early return
        let mut settled = Vec::with_capacity(set.len());
        let mut join_error = None;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => settled.push(outcome),
                Err(err) => {
                    join_error.get_or_insert(err);
                }
            }
        }

        if let Some(err) = join_error {
            return Err(err.into());
        }

        settled.sort_by_key(|(index, _)| *index);
        settled.into_iter().try_for_each(|(_, result)| result)
    }
}
