//! Implements the ReleaseClient trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;

use crate::{
    forge::{
        config::{ClientConfig, ClientType, GITHUB_TOKEN_VAR},
        traits::ReleaseClient,
        types::CreateReleaseRequest,
    },
    result::Result,
};

/// GitHub release client using Octocrab. Works against GitHub.com or, with
/// an API URL override, GitHub Enterprise.
pub struct Github {
    instance: Octocrab,
}

impl Github {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Octocrab::builder();

        match config.token {
            Some(token) => builder = builder.personal_token(token),
            None => warn!(
                "{GITHUB_TOKEN_VAR} is not set: github requests will be unauthenticated"
            ),
        }

        if let Some(api_url) = config.api_url {
            debug!("using github api url: {api_url}");
            builder = builder.base_uri(api_url)?;
        }

        let instance = builder.build()?;

        Ok(Self { instance })
    }
}

#[async_trait]
impl ReleaseClient for Github {
    fn client_type(&self) -> ClientType {
        ClientType::Github
    }

    async fn create_release(&self, req: CreateReleaseRequest) -> Result<()> {
        info!(
            "creating github release {} for {}/{}",
            req.tag_name, req.owner, req.repo
        );

        self.instance
            .repos(&req.owner, &req.repo)
            .releases()
            .create(&req.tag_name)
            .name(&req.name)
            .body(&req.body)
            .draft(req.draft)
            .prerelease(req.prerelease)
            .send()
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[tokio::test]
    async fn builds_without_network_access() {
        let client = Github::new(ClientConfig {
            token: Some(SecretString::from("token".to_string())),
            api_url: Some("https://github.example.com/api/v3".into()),
        })
        .unwrap();

        assert_eq!(client.client_type(), ClientType::Github);
    }

    #[tokio::test]
    async fn builds_without_token() {
        let client = Github::new(ClientConfig::default()).unwrap();
        assert_eq!(client.client_type(), ClientType::Github);
    }
}
