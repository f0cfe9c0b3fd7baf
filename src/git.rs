//! Local git queries used to work out where each package currently stands.

/// Current branch lookup.
pub mod branch;

/// `git describe` invocation and parsing.
pub mod describe;

/// Remote URL parsing into owner / repository name.
pub mod remote;

/// Program name used for every git invocation.
pub const GIT: &str = "git";

pub(crate) fn git_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
