//! Describe the current commit relative to the nearest release tag.
//!
//! `git describe --always --long --dirty` has two output grammars:
//!
//! - `<sha>[-dirty]` when no (matching) annotated tag is reachable
//! - `<tag>-<distance>-g<sha>[-dirty]` otherwise, where `<tag>` may be
//!   scoped as `name@version`
//!
//! The first shape becomes [`DescribeResult::Fallback`], which needs a
//! second `rev-list --count` query to know how deep history goes. The second
//! becomes [`DescribeResult::Detailed`].
use log::*;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;

use crate::{
    exec::{ExecOptions, Executor},
    git::{GIT, git_args},
    result::Result,
};

const MINIMAL_SHA_PATTERN: &str = r"^([0-9a-f]{7,40})(-dirty)?$";
// a leading `v` before a digit stays part of the tag name but not of the
// version; `vnext` keeps its `v`
const DETAILED_PATTERN: &str =
    r"^((?:.*@)?(?:v([0-9].*)|(.*)))-([0-9]+)-g([0-9a-f]+)(-dirty)?$";

/// Inputs for a describe query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeQuery {
    /// Glob passed to `--match`.
    pub match_pattern: Option<String>,
    /// Consider tags reachable through merged branches, not only the
    /// first-parent chain.
    pub include_merged_tags: bool,
    /// Repository directory, defaults to the current directory.
    pub cwd: Option<PathBuf>,
}

impl DescribeQuery {
    fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            cwd: self.cwd.clone(),
        }
    }
}

/// No annotated tag matched anywhere in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackRef {
    /// Total number of commits reachable from `sha`.
    pub ref_count: String,
    pub sha: String,
    pub is_dirty: bool,
}

/// An annotated tag matched.
///
/// Every field except `is_dirty` is `None` only when git produced output
/// neither grammar recognises.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_tag_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_version: Option<String>,
    /// Commits between the tag and HEAD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub is_dirty: bool,
}

impl DetailedRef {
    /// True when the describe output was not recognised at all.
    pub fn is_degenerate(&self) -> bool {
        self.last_tag_name.is_none()
            && self.last_version.is_none()
            && self.ref_count.is_none()
            && self.sha.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DescribeResult {
    Fallback(FallbackRef),
    Detailed(DetailedRef),
}

impl DescribeResult {
    pub fn is_dirty(&self) -> bool {
        match self {
            Self::Fallback(r) => r.is_dirty,
            Self::Detailed(r) => r.is_dirty,
        }
    }

    pub fn sha(&self) -> Option<&str> {
        match self {
            Self::Fallback(r) => Some(&r.sha),
            Self::Detailed(r) => r.sha.as_deref(),
        }
    }

    pub fn ref_count(&self) -> Option<&str> {
        match self {
            Self::Fallback(r) => Some(&r.ref_count),
            Self::Detailed(r) => r.ref_count.as_deref(),
        }
    }

    pub fn last_tag_name(&self) -> Option<&str> {
        match self {
            Self::Fallback(_) => None,
            Self::Detailed(r) => r.last_tag_name.as_deref(),
        }
    }

    pub fn last_version(&self) -> Option<&str> {
        match self {
            Self::Fallback(_) => None,
            Self::Detailed(r) => r.last_version.as_deref(),
        }
    }
}

/// Output of the describe command before the commit count is known.
#[derive(Debug, PartialEq, Eq)]
enum ParsedDescribe {
    MinimalSha { sha: String, is_dirty: bool },
    Detailed(DetailedRef),
}

/// Build the `git describe` argument list for a query.
pub fn describe_args(query: &DescribeQuery) -> Vec<String> {
    let mut args = git_args(&[
        "describe",
        // fall back to the short sha when no tag is reachable
        "--always",
        // always emit tag-distance-sha
        "--long",
        "--dirty",
        // prefer tags created on the upstream branch
        "--first-parent",
    ]);

    if let Some(pattern) = &query.match_pattern {
        args.push("--match".into());
        args.push(pattern.clone());
    }

    if query.include_merged_tags {
        args.retain(|a| a != "--first-parent");
    }

    args
}

fn rev_list_count_args(sha: &str) -> Vec<String> {
    git_args(&["rev-list", "--count", sha])
}

fn parse(stdout: &str) -> Result<ParsedDescribe> {
    let minimal_sha_re = Regex::new(MINIMAL_SHA_PATTERN)?;

    if let Some(caps) = minimal_sha_re.captures(stdout) {
        return Ok(ParsedDescribe::MinimalSha {
            sha: caps[1].to_string(),
            is_dirty: caps.get(2).is_some(),
        });
    }

    let detailed_re = Regex::new(DETAILED_PATTERN)?;

    let Some(caps) = detailed_re.captures(stdout) else {
        return Ok(ParsedDescribe::Detailed(DetailedRef::default()));
    };

    let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());

    Ok(ParsedDescribe::Detailed(DetailedRef {
        last_tag_name: group(1),
        last_version: group(2).or_else(|| group(3)),
        ref_count: group(4),
        sha: group(5),
        is_dirty: caps.get(6).is_some(),
    }))
}

/// Describe HEAD without blocking the runtime.
pub async fn describe_ref(
    exec: &dyn Executor,
    query: &DescribeQuery,
) -> Result<DescribeResult> {
    let opts = query.exec_options();
    let stdout = exec.exec(GIT, &describe_args(query), &opts).await?;

    let result = match parse(&stdout)? {
        ParsedDescribe::MinimalSha { sha, is_dirty } => {
            // count every commit since the beginning of history
            let ref_count =
                exec.exec(GIT, &rev_list_count_args(&sha), &opts).await?;
            DescribeResult::Fallback(FallbackRef {
                ref_count,
                sha,
                is_dirty,
            })
        }
        ParsedDescribe::Detailed(detailed) => {
            DescribeResult::Detailed(detailed)
        }
    };

    debug!("git-describe {:?} => {:?}", query.match_pattern, stdout);
    trace!("git-describe parsed => {:?}", result);

    Ok(result)
}

/// Blocking form of [`describe_ref`].
pub fn describe_ref_sync(
    exec: &dyn Executor,
    query: &DescribeQuery,
) -> Result<DescribeResult> {
    let opts = query.exec_options();
    let stdout = exec.exec_sync(GIT, &describe_args(query), &opts)?;

    let result = match parse(&stdout)? {
        ParsedDescribe::MinimalSha { sha, is_dirty } => {
            let ref_count =
                exec.exec_sync(GIT, &rev_list_count_args(&sha), &opts)?;
            DescribeResult::Fallback(FallbackRef {
                ref_count,
                sha,
                is_dirty,
            })
        }
        ParsedDescribe::Detailed(detailed) => {
            DescribeResult::Detailed(detailed)
        }
    };

    trace!("git-describe.sync {:?} => {:?}", stdout, result);

    Ok(result)
}
