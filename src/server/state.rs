use std::sync::Arc;

use crate::analysis::NarrationPipeline;
use crate::config::Config;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::llm::{GeminiProvider, ImagenProvider, ThumbnailProvider};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<NarrationPipeline>,
    pub thumbnails: Arc<dyn ThumbnailProvider>,
}

impl AppState {
    pub fn new(pipeline: NarrationPipeline, thumbnails: impl ThumbnailProvider + 'static) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            thumbnails: Arc::new(thumbnails),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let github = GitHubClient::new(config)?;
        let llm = GeminiProvider::new(config)?;
        let thumbnails = ImagenProvider::new(config)?;
        Ok(Self::new(NarrationPipeline::new(github, llm), thumbnails))
    }
}
