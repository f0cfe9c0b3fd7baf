//! Factory for creating release clients based on configuration.
use crate::{
    forge::{
        config::{ClientConfig, ClientType},
        github::Github,
        gitlab::Gitlab,
        traits::ReleaseClient,
    },
    result::Result,
};

/// Create a release client for `client_type` (`github` or `gitlab`) using
/// credentials from the environment.
///
/// Callers are expected to have validated the name already; anything else
/// fails with an `ERELEASE` validation error before any network activity.
pub fn create_release_client(
    client_type: &str,
) -> Result<Box<dyn ReleaseClient>> {
    let client_type: ClientType = client_type.parse()?;
    create_release_client_with(client_type, ClientConfig::from_env(client_type))
}

/// Create a release client with explicit connection settings.
pub fn create_release_client_with(
    client_type: ClientType,
    config: ClientConfig,
) -> Result<Box<dyn ReleaseClient>> {
    match client_type {
        ClientType::Github => Ok(Box::new(Github::new(config)?)),
        ClientType::Gitlab => Ok(Box::new(Gitlab::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ERELEASE, RollerError};

    #[test]
    fn rejects_unknown_client_type() {
        let report = create_release_client("bogus").err().unwrap();
        let err = report.downcast_ref::<RollerError>().unwrap();

        assert!(matches!(err, RollerError::Validation { .. }));
        assert_eq!(err.code(), Some(ERELEASE));
    }

    #[tokio::test]
    async fn creates_github_client() {
        let client = create_release_client("github").unwrap();
        assert_eq!(client.client_type(), ClientType::Github);
    }

    #[tokio::test]
    async fn creates_gitlab_client() {
        let client = create_release_client("gitlab").unwrap();
        assert_eq!(client.client_type(), ClientType::Gitlab);
    }

    #[tokio::test]
    async fn each_call_returns_a_new_client() {
        let first = create_release_client("github").unwrap();
        let second = create_release_client("github").unwrap();

        let first_ptr = first.as_ref() as *const dyn ReleaseClient as *const u8;
        let second_ptr =
            second.as_ref() as *const dyn ReleaseClient as *const u8;
        assert_ne!(first_ptr, second_ptr);
    }
}
