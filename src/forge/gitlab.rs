//! Implements the ReleaseClient trait for Gitlab
use async_trait::async_trait;
use log::*;
use reqwest::{
    Client, Url,
    header::{HeaderMap, HeaderValue},
};
use secrecy::ExposeSecret;
use serde::Serialize;
use url::form_urlencoded;

use crate::{
    error::RollerError,
    forge::{
        config::{
            ClientConfig, ClientType, DEFAULT_GITLAB_API_URL,
            GITLAB_TOKEN_VAR,
        },
        traits::ReleaseClient,
        types::CreateReleaseRequest,
    },
    result::Result,
};

#[derive(Debug, Serialize)]
struct CreateRelease<'a> {
    name: &'a str,
    tag_name: &'a str,
    description: &'a str,
}

/// GitLab release client talking to the REST API with reqwest.
pub struct Gitlab {
    client: Client,
    api_url: Url,
}

impl Gitlab {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        match config.token {
            Some(token) => {
                let mut value = HeaderValue::from_str(token.expose_secret())?;
                value.set_sensitive(true);
                headers.append("private-token", value);
            }
            None => warn!(
                "{GITLAB_TOKEN_VAR} is not set: gitlab requests will be unauthenticated"
            ),
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let api_url = config
            .api_url
            .unwrap_or_else(|| DEFAULT_GITLAB_API_URL.to_string());
        // trailing slash so relative joins keep the api path
        let api_url = Url::parse(&format!("{}/", api_url.trim_end_matches('/')))?;

        Ok(Self { client, api_url })
    }

    fn releases_url(&self, owner: &str, repo: &str) -> Result<Url> {
        let project: String =
            form_urlencoded::byte_serialize(format!("{owner}/{repo}").as_bytes())
                .collect();
        let url = self.api_url.join(&format!("projects/{project}/releases"))?;
        Ok(url)
    }
}

#[async_trait]
impl ReleaseClient for Gitlab {
    fn client_type(&self) -> ClientType {
        ClientType::Gitlab
    }

    async fn create_release(&self, req: CreateReleaseRequest) -> Result<()> {
        let url = self.releases_url(&req.owner, &req.repo)?;

        info!("creating gitlab release {} at {url}", req.tag_name);

        let data = CreateRelease {
            name: &req.name,
            tag_name: &req.tag_name,
            description: &req.body,
        };

        let request = self.client.post(url).json(&data).build()?;
        let response = self.client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("gitlab rejected release {}: {status}", req.tag_name);
            return Err(RollerError::release_creation(
                req.tag_name,
                format!("{status}: {body}"),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    fn request(tag: &str) -> CreateReleaseRequest {
        CreateReleaseRequest {
            owner: "group/sub".into(),
            repo: "project".into(),
            tag_name: tag.into(),
            name: tag.into(),
            body: "notes".into(),
            draft: false,
            prerelease: false,
        }
    }

    fn header_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
    }

    fn content_length(head: &str) -> usize {
        head.lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                if key.eq_ignore_ascii_case("content-length") {
                    value.trim().parse().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0)
    }

    /// Serve a single request, answering with `status_line`, and hand back
    /// the raw request text.
    async fn serve_once(
        status_line: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![];
            let mut chunk = [0u8; 1024];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(end) = header_end(&buf) {
                    let head = String::from_utf8_lossy(&buf[..end]).to_string();
                    if buf.len() >= end + content_length(&head) {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{{}}"
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&buf).to_string()
        });

        (format!("http://{addr}/api/v4"), handle)
    }

    #[test]
    fn encodes_project_path() {
        let gitlab = Gitlab::new(ClientConfig::default()).unwrap();
        let url = gitlab.releases_url("group/sub", "project").unwrap();

        assert_eq!(
            url.as_str(),
            "https://gitlab.com/api/v4/projects/group%2Fsub%2Fproject/releases"
        );
    }

    #[tokio::test]
    async fn posts_release_payload() {
        let (api_url, server) = serve_once("201 Created").await;

        let gitlab = Gitlab::new(ClientConfig {
            token: Some(SecretString::from("gl-token".to_string())),
            api_url: Some(api_url),
        })
        .unwrap();

        gitlab.create_release(request("v1.0.0")).await.unwrap();

        let raw = server.await.unwrap();
        assert!(raw.starts_with(
            "POST /api/v4/projects/group%2Fsub%2Fproject/releases HTTP/1.1"
        ));
        assert!(raw.to_lowercase().contains("private-token: gl-token"));
        assert!(raw.contains(r#""tag_name":"v1.0.0""#));
        assert!(raw.contains(r#""description":"notes""#));
    }

    #[tokio::test]
    async fn rejected_release_is_an_error() {
        let (api_url, server) = serve_once("409 Conflict").await;

        let gitlab = Gitlab::new(ClientConfig {
            token: None,
            api_url: Some(api_url),
        })
        .unwrap();

        let report = gitlab.create_release(request("v1.0.0")).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            report.downcast_ref::<RollerError>(),
            Some(RollerError::ReleaseCreation { .. })
        ));
    }
}
