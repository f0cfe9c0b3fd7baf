//! Resolve a git remote to the owner and name of the hosted repository.
use git_url_parse::{GitUrl, Scheme};
use log::*;

use crate::{
    error::RollerError,
    exec::{ExecOptions, Executor},
    git::{GIT, git_args},
    result::Result,
};

/// Hosted repository coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepo {
    /// User, organisation or (possibly nested) group path.
    pub owner: String,
    pub name: String,
}

fn looks_like_url(remote: &str) -> bool {
    remote.contains("://") || (remote.contains('@') && remote.contains(':'))
}

async fn remote_url(
    exec: &dyn Executor,
    remote: &str,
    opts: &ExecOptions,
) -> Result<String> {
    let key = format!("remote.{remote}.url");
    let url = exec
        .exec(GIT, &git_args(&["config", "--get", &key]), opts)
        .await
        .map_err(|err| {
            RollerError::unresolvable_remote(remote, format!("{err}"))
        })?;

    if url.is_empty() {
        return Err(RollerError::unresolvable_remote(
            remote,
            "remote has no url configured",
        )
        .into());
    }

    Ok(url)
}

fn repo_from_url(remote: &str, url: &str) -> Result<GitRepo> {
    let parsed = GitUrl::parse(url).map_err(|err| {
        RollerError::unresolvable_remote(remote, err.to_string())
    })?;

    if matches!(parsed.scheme, Scheme::File) {
        return Err(RollerError::unresolvable_remote(
            remote,
            "local file remotes have no owner",
        )
        .into());
    }

    let path = parsed.path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let owner = match path.rsplit_once('/') {
        Some((owner, _)) if !owner.is_empty() => Some(owner.to_string()),
        _ => parsed.owner.filter(|o| !o.is_empty()),
    };

    let Some(owner) = owner else {
        return Err(RollerError::unresolvable_remote(
            remote,
            format!("unable to parse owner from {url}"),
        )
        .into());
    };

    if parsed.name.is_empty() {
        return Err(RollerError::unresolvable_remote(
            remote,
            format!("unable to parse repository name from {url}"),
        )
        .into());
    }

    Ok(GitRepo {
        owner,
        name: parsed.name,
    })
}

/// Parse either a remote URL (SSH or HTTPS) or the name of a configured
/// remote such as `origin`. Remote names are looked up through `exec`.
pub async fn parse_git_repo(
    exec: &dyn Executor,
    remote: &str,
    opts: &ExecOptions,
) -> Result<GitRepo> {
    let url = if looks_like_url(remote) {
        remote.to_string()
    } else {
        remote_url(exec, remote, opts).await?
    };

    let repo = repo_from_url(remote, &url)?;
    debug!("resolved remote {remote} to {}/{}", repo.owner, repo.name);

    Ok(repo)
}
