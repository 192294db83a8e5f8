pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod llm;
pub mod analysis;
pub mod server;
pub mod client;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ClientConfig, Config};
pub use error::{Error, Result};
pub use github::{GitHubClient, RepositorySource};
pub use llm::{GeminiProvider, ImagenProvider, LLMProvider, ThumbnailProvider};
pub use analysis::NarrationPipeline;
pub use client::{ProxyClient, Session};
