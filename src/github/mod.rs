pub mod client;
pub mod url;

pub use client::{GitHubClient, RepositorySource};
pub use url::parse_repository_url;
