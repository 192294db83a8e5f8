use std::sync::Arc;

use crate::error::Result;
use crate::github::{parse_repository_url, RepositorySource};
use crate::llm::{LLMProvider, NarrationRequest, RepositoryContext};
use crate::models::{AnalysisRequest, RawNarration, RepoStats};

pub struct NarrationPipeline {
    source: Arc<dyn RepositorySource>,
    llm: Arc<dyn LLMProvider>,
}

impl NarrationPipeline {
    pub fn new(source: impl RepositorySource + 'static, llm: impl LLMProvider + 'static) -> Self {
        Self {
            source: Arc::new(source),
            llm: Arc::new(llm),
        }
    }

    pub async fn narrate(&self, request: &AnalysisRequest) -> Result<RawNarration> {
        // Step 1: Validate before touching the network
        let repo = parse_repository_url(request.github_url.as_deref().unwrap_or_default())?;

        // Step 2: Metadata and README are independent, fetch both at once
        tracing::info!("Narrating repository: {}", repo);
        let (metadata, readme) = futures::future::join(
            self.source.get_repository(&repo),
            self.source.get_readme(&repo),
        )
        .await;

        let metadata = metadata?;
        let readme = readme.unwrap_or_else(|e| {
            tracing::warn!("Could not fetch README.md for {}: {}", repo, e);
            String::new()
        });

        // Step 3: Stats come from GitHub only, never from the model
        let stats = RepoStats::from_repository(&metadata, &readme);

        // Step 4: Ask the model for analysis and script in one structured call
        let narration_request = NarrationRequest::new(
            RepositoryContext::new(&metadata, readme),
            request.preferences(),
        );
        tracing::info!("Requesting narration from {}", self.llm.name());
        let narration = self.llm.generate_narration(&narration_request).await?;

        if let Some(script) = narration.script() {
            let scene_total = script.scene_total_secs();
            if (scene_total - script.duration_secs).abs() > f64::EPSILON {
                tracing::debug!(
                    "Scene durations sum to {}s, script declares {}s",
                    scene_total,
                    script.duration_secs
                );
            }
        }

        // Step 5: Merge, leaving the model's fields as they are
        narration.with_stats(&stats)
    }
}
