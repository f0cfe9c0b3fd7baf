//! Configuration for release provider connections.
use secrecy::SecretString;
use std::{env, fmt, str::FromStr};

use crate::error::{ERELEASE, RollerError};

/// Token used for GitHub and GitHub Enterprise.
pub const GITHUB_TOKEN_VAR: &str = "GH_TOKEN";
/// API base URL for GitHub Enterprise instances.
pub const GITHUB_API_URL_VAR: &str = "GHE_API_URL";
/// Token used for GitLab.com and self-hosted GitLab.
pub const GITLAB_TOKEN_VAR: &str = "GL_TOKEN";
/// API base URL for self-hosted GitLab instances.
pub const GITLAB_API_URL_VAR: &str = "GL_API_URL";
/// Default GitLab REST API root.
pub const DEFAULT_GITLAB_API_URL: &str = "https://gitlab.com/api/v4";

/// Supported release providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientType {
    Github,
    Gitlab,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Github => "github",
            ClientType::Gitlab => "gitlab",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = RollerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(ClientType::Github),
            "gitlab" => Ok(ClientType::Gitlab),
            _ => Err(RollerError::validation(
                ERELEASE,
                format!("Invalid release client type: {s}"),
            )),
        }
    }
}

/// Connection settings for a release client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Access token, requests are unauthenticated without one.
    pub token: Option<SecretString>,
    /// API base URL override for self-hosted instances.
    pub api_url: Option<String>,
}

impl ClientConfig {
    /// Read the provider's token and API URL from the environment.
    pub fn from_env(client_type: ClientType) -> Self {
        Self::from_lookup(client_type, |key| env::var(key).ok())
    }

    fn from_lookup(
        client_type: ClientType,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let (token_var, url_var) = match client_type {
            ClientType::Github => (GITHUB_TOKEN_VAR, GITHUB_API_URL_VAR),
            ClientType::Gitlab => (GITLAB_TOKEN_VAR, GITLAB_API_URL_VAR),
        };

        let token = lookup(token_var)
            .filter(|t| !t.is_empty())
            .map(SecretString::from);
        let api_url = lookup(url_var).filter(|u| !u.is_empty());

        Self { token, api_url }
    }
}
