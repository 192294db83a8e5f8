use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};

use crate::config::{http_client, Config};
use crate::error::{Error, Result};
use crate::models::{RepositoryMetadata, RepositoryRef};

#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn get_repository(&self, repo: &RepositoryRef) -> Result<RepositoryMetadata>;

    async fn get_readme(&self, repo: &RepositoryRef) -> Result<String>;
}

pub struct GitHubClient {
    client: Client,
    raw_client: Client,
    base_url: String,
    raw_url: String,
    readme_branch: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = &config.github_token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("codenarrator/0.1"),
        );
        let client = http_client(config.http_timeout, headers)?;

        let mut raw_headers = header::HeaderMap::new();
        raw_headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("codenarrator/0.1"),
        );
        let raw_client = http_client(config.http_timeout, raw_headers)?;

        Ok(Self {
            client,
            raw_client,
            base_url: config.github_api_url.clone(),
            raw_url: config.github_raw_url.clone(),
            readme_branch: config.readme_branch.clone(),
        })
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn get_repository(&self, repo: &RepositoryRef) -> Result<RepositoryMetadata> {
        let url = format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.name);
        tracing::info!("Fetching repository: {}", repo);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::RepoNotFound(repo.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "{} ({}): {}",
                status, repo, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn get_readme(&self, repo: &RepositoryRef) -> Result<String> {
        let url = format!(
            "{}/{}/{}/{}/README.md",
            self.raw_url, repo.owner, repo.name, self.readme_branch
        );
        tracing::debug!("Fetching README: {}", url);

        let response = self.raw_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "README for {}: {}",
                repo,
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{github_stub, serve_stub};

    async fn client() -> GitHubClient {
        let base = serve_stub(github_stub()).await;
        let mut config = Config::with_api_key("test-key");
        config.github_api_url = base.clone();
        config.github_raw_url = base;
        GitHubClient::new(&config).unwrap()
    }

    fn repo(name: &str) -> RepositoryRef {
        RepositoryRef {
            owner: "acme".into(),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn test_get_repository() {
        let metadata = client().await.get_repository(&repo("widget")).await.unwrap();
        assert_eq!(metadata.name, "widget");
        assert_eq!(metadata.stargazers_count, 10);
        assert_eq!(metadata.subscribers_count, 1);
        assert_eq!(metadata.last_update(), "1/1/2024");
    }

    #[tokio::test]
    async fn test_get_repository_errors() {
        let client = client().await;

        let err = client.get_repository(&repo("ghost")).await.unwrap_err();
        assert!(matches!(err, Error::RepoNotFound(ref r) if r == "acme/ghost"));

        let err = client.get_repository(&repo("broken")).await.unwrap_err();
        assert!(matches!(err, Error::GitHubApi(_)));
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_get_readme() {
        let client = client().await;

        let readme = client.get_readme(&repo("docs")).await.unwrap();
        assert!(readme.starts_with("# Docs"));

        let err = client.get_readme(&repo("widget")).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
